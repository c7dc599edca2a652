//! Response rendering.
//!
//! The default renderer negotiates between the route's response media type
//! override (if any) and JSON/YAML, then serializes the handler's output.
//! Render hooks replace all of that and may ignore the payload.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use mime::Mime;
use serde::Serialize;
use serde_json::Value;

use crate::error::RenderError;
use crate::media::{negotiate, BodyFormat, DEFAULT_RESPONSE_MEDIA_TYPES};
use crate::response::{respond, IntoResponse};

/// What a renderer knows about the request it answers.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    headers: &'a HeaderMap,
    pretty: bool,
}

impl<'a> RenderContext<'a> {
    /// Creates a context over the request headers.
    pub fn new(headers: &'a HeaderMap, pretty: bool) -> Self {
        Self { headers, pretty }
    }

    /// The request's `Accept` header.
    pub fn accept(&self) -> Option<&'a str> {
        self.headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
    }

    /// All request headers.
    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Whether JSON should be indented.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// Turns a handler's output into a response.
pub trait Renderer<T>: Send + Sync + 'static {
    /// Renders `payload` with `status`.
    fn render(
        &self,
        status: StatusCode,
        payload: T,
        cx: &RenderContext<'_>,
    ) -> Result<Response<Bytes>, RenderError>;
}

/// Adapts a closure into a [`Renderer`].
///
/// The closure's return value only has to implement [`IntoResponse`]; the
/// status it sets wins over the route's success status.
///
/// ```rust
/// use daedalus_extract::{FnRenderer, RenderContext, Renderer};
/// use http::{HeaderMap, StatusCode};
///
/// let health = FnRenderer::new(|_: u32| "OK");
/// let headers = HeaderMap::new();
/// let response = health
///     .render(StatusCode::OK, 7, &RenderContext::new(&headers, false))
///     .unwrap();
/// assert_eq!(&response.body()[..], b"OK");
/// ```
pub struct FnRenderer<F> {
    f: F,
}

impl<F> FnRenderer<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnRenderer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRenderer").finish_non_exhaustive()
    }
}

impl<T, R, F> Renderer<T> for FnRenderer<F>
where
    F: Fn(T) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn render(
        &self,
        _status: StatusCode,
        payload: T,
        _cx: &RenderContext<'_>,
    ) -> Result<Response<Bytes>, RenderError> {
        Ok((self.f)(payload).into_response())
    }
}

/// The negotiating renderer.
pub struct DefaultRenderer<T> {
    offers: Vec<Mime>,
    empty: bool,
    _marker: PhantomData<fn(T)>,
}

impl<T> fmt::Debug for DefaultRenderer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRenderer")
            .field("offers", &self.offers)
            .field("empty", &self.empty)
            .finish()
    }
}

impl<T> Default for DefaultRenderer<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> DefaultRenderer<T> {
    /// Offers only `media_override` if given, JSON and YAML otherwise.
    pub fn new(media_override: Option<Mime>) -> Self {
        let offers = match media_override {
            Some(media) => vec![media],
            None => DEFAULT_RESPONSE_MEDIA_TYPES
                .iter()
                .filter_map(|m| m.parse().ok())
                .collect(),
        };
        Self {
            offers,
            empty: false,
            _marker: PhantomData,
        }
    }

    /// Outputs without a body (`()`) render as a bare status.
    #[must_use]
    pub fn empty_body(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }

    /// Media types this renderer can produce.
    pub fn offers(&self) -> &[Mime] {
        &self.offers
    }

    /// Chooses the media type for a request; JSON when nothing acceptable is
    /// offered.
    pub fn choose(&self, accept: Option<&str>) -> Mime {
        negotiate(accept, &self.offers)
            .or_else(|| self.offers.first())
            .cloned()
            .unwrap_or(mime::APPLICATION_JSON)
    }
}

impl<T> Renderer<T> for DefaultRenderer<T>
where
    T: Serialize + 'static,
{
    fn render(
        &self,
        status: StatusCode,
        payload: T,
        cx: &RenderContext<'_>,
    ) -> Result<Response<Bytes>, RenderError> {
        if self.empty {
            return Ok(status.into_response());
        }

        let chosen = self.choose(cx.accept());
        let format = BodyFormat::from_mime(&chosen)
            .ok_or_else(|| RenderError::UnsupportedMediaType(chosen.to_string()))?;

        let (content_type, body) = match format {
            BodyFormat::Json => {
                let body = if cx.pretty() {
                    serde_json::to_vec_pretty(&payload)?
                } else {
                    serde_json::to_vec(&payload)?
                };
                let content_type = if chosen.essence_str() == "application/json" {
                    HeaderValue::from_static("application/json")
                } else {
                    header_value(&chosen)?
                };
                (content_type, Bytes::from(body))
            }
            BodyFormat::Yaml => (
                HeaderValue::from_static(format.content_type()),
                Bytes::from(serde_yaml::to_string(&payload)?),
            ),
            BodyFormat::Text => {
                let text = match serde_json::to_value(&payload)? {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (HeaderValue::from_static(format.content_type()), Bytes::from(text))
            }
            BodyFormat::Form => (
                HeaderValue::from_static(format.content_type()),
                Bytes::from(serde_urlencoded::to_string(&payload).map_err(|e| {
                    RenderError::UnsupportedMediaType(format!("{chosen}: {e}"))
                })?),
            ),
        };

        let mut response = respond(status, "application/json", body);
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        Ok(response)
    }
}

fn header_value(media: &Mime) -> Result<HeaderValue, RenderError> {
    HeaderValue::from_str(media.as_ref())
        .map_err(|_| RenderError::UnsupportedMediaType(media.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render<T: Serialize + 'static>(
        renderer: &DefaultRenderer<T>,
        payload: T,
        accept: Option<&str>,
    ) -> Response<Bytes> {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, accept.parse().unwrap());
        }
        renderer
            .render(StatusCode::OK, payload, &RenderContext::new(&headers, false))
            .unwrap()
    }

    #[test]
    fn test_json_by_default() {
        let renderer = DefaultRenderer::default();
        let response = render(&renderer, json!({"name": "fig"}), None);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(&response.body()[..], br#"{"name":"fig"}"#);
    }

    #[test]
    fn test_yaml_when_asked() {
        let renderer = DefaultRenderer::default();
        let response = render(&renderer, json!({"name": "fig"}), Some("application/yaml"));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/yaml");
        assert_eq!(&response.body()[..], b"name: fig\n");
    }

    #[test]
    fn test_unacceptable_falls_back_to_json() {
        let renderer = DefaultRenderer::default();
        let response = render(&renderer, json!([1, 2]), Some("text/html"));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_text_override_is_verbatim() {
        let renderer = DefaultRenderer::new(Some(mime::TEXT_PLAIN));
        let response = render(&renderer, "pong".to_string(), Some("application/json"));
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(&response.body()[..], b"pong");
    }

    #[test]
    fn test_vendor_json_override_keeps_type() {
        let renderer = DefaultRenderer::new(Some("application/vnd.fruit+json".parse().unwrap()));
        let response = render(&renderer, json!({"a": 1}), None);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.fruit+json"
        );
    }

    #[test]
    fn test_empty_output_has_no_body() {
        let renderer = DefaultRenderer::<()>::default().empty_body(true);
        let headers = HeaderMap::new();
        let response = renderer
            .render(StatusCode::NO_CONTENT, (), &RenderContext::new(&headers, false))
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_unknown_override_errors() {
        let renderer = DefaultRenderer::new(Some(mime::IMAGE_PNG));
        let headers = HeaderMap::new();
        let err = renderer
            .render(StatusCode::OK, 1, &RenderContext::new(&headers, false))
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedMediaType(_)));
    }
}
