//! Serving the generated document.
//!
//! [`DocumentEndpoint`] answers the document paths of an application. The
//! document is generated on the first request and its JSON and YAML forms
//! are memoized; the registry behind an [`Api`] is frozen, so nothing ever
//! invalidates them.

use std::sync::OnceLock;

use bytes::Bytes;
use daedalus_core::Api;
use daedalus_extract::{negotiate, BodyFormat, ErrorResponse, IntoResponse, APPLICATION_YAML};
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use mime::Mime;

use crate::error::{DocsError, DocsResult};
use crate::generator::OpenApiGenerator;
use crate::openapi::OpenApi;
use crate::swagger::SwaggerUi;

/// Where the document is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    /// JSON document, `/openapi.json` by default
    pub json: String,
    /// YAML document, `/openapi.yaml` by default
    pub yaml: String,
    /// Document in the format the `Accept` header asks for, `/openapi` by
    /// default
    pub negotiated: String,
    /// Swagger UI page, `/swagger` by default; `None` disables it
    pub swagger: Option<String>,
}

impl Default for DocumentPaths {
    fn default() -> Self {
        Self {
            json: "/openapi.json".to_string(),
            yaml: "/openapi.yaml".to_string(),
            negotiated: "/openapi".to_string(),
            swagger: Some("/swagger".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Json,
    Yaml,
    Negotiated,
    Swagger,
}

#[derive(Debug)]
struct Rendered {
    json: Bytes,
    yaml: Bytes,
}

/// Serves the OpenAPI document of an [`Api`].
///
/// ```
/// use bytes::Bytes;
/// use daedalus_core::{HandlerError, Registry, RequestContext, Route};
/// use daedalus_docs::{DocumentEndpoint, OpenApiGenerator};
/// use http::{Request, StatusCode};
///
/// async fn ping(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
///     Ok("pong".to_string())
/// }
///
/// let mut registry = Registry::default();
/// registry.root().register(Route::get("/ping", ping));
/// let endpoint = DocumentEndpoint::new(registry.build().unwrap(), OpenApiGenerator::new());
///
/// let request = Request::get("/openapi.yaml").body(Bytes::new()).unwrap();
/// let response = endpoint.handle(&request).unwrap();
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.headers()["content-type"], "application/yaml");
///
/// let request = Request::get("/ping").body(Bytes::new()).unwrap();
/// assert!(endpoint.handle(&request).is_none());
/// ```
#[derive(Debug)]
pub struct DocumentEndpoint {
    api: Api,
    generator: OpenApiGenerator,
    paths: DocumentPaths,
    document: OnceLock<OpenApi>,
    rendered: OnceLock<Result<Rendered, DocsError>>,
    swagger: OnceLock<Bytes>,
}

impl DocumentEndpoint {
    /// Serves the document of `api` at the default paths.
    pub fn new(api: Api, generator: OpenApiGenerator) -> Self {
        Self {
            api,
            generator,
            paths: DocumentPaths::default(),
            document: OnceLock::new(),
            rendered: OnceLock::new(),
            swagger: OnceLock::new(),
        }
    }

    /// Serves at other paths.
    #[must_use]
    pub fn with_paths(mut self, paths: DocumentPaths) -> Self {
        self.paths = paths;
        self
    }

    /// The configured paths.
    pub fn paths(&self) -> &DocumentPaths {
        &self.paths
    }

    /// The document, generated on first use.
    pub fn document(&self) -> &OpenApi {
        self.document.get_or_init(|| self.generator.generate(&self.api))
    }

    /// The document as pretty-printed JSON.
    pub fn json(&self) -> Result<Bytes, &DocsError> {
        self.rendered().map(|r| r.json.clone())
    }

    /// The document as YAML.
    pub fn yaml(&self) -> Result<Bytes, &DocsError> {
        self.rendered().map(|r| r.yaml.clone())
    }

    /// True if `path` is one of the document paths.
    pub fn serves(&self, path: &str) -> bool {
        self.target(path).is_some()
    }

    /// Answers a request for one of the document paths, or returns `None`
    /// so the caller can route it elsewhere.
    pub fn handle<B>(&self, request: &Request<B>) -> Option<Response<Bytes>> {
        let target = self.target(request.uri().path())?;

        let method = request.method();
        if method != Method::GET && method != Method::HEAD {
            let mut response = ErrorResponse::new(
                StatusCode::METHOD_NOT_ALLOWED,
                "method-not-allowed",
                format!("{method} is not allowed on {}", request.uri().path()),
            )
            .into_response();
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
            return Some(response);
        }

        let mut response = match target {
            Target::Json => self.serve(BodyFormat::Json),
            Target::Yaml => self.serve(BodyFormat::Yaml),
            Target::Negotiated => {
                let accept = request
                    .headers()
                    .get(header::ACCEPT)
                    .and_then(|v| v.to_str().ok());
                self.serve(negotiate_format(accept))
            }
            Target::Swagger => self.swagger_page(),
        };
        if method == Method::HEAD {
            *response.body_mut() = Bytes::new();
        }
        Some(response)
    }

    fn target(&self, path: &str) -> Option<Target> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        if path == self.paths.json {
            Some(Target::Json)
        } else if path == self.paths.yaml {
            Some(Target::Yaml)
        } else if path == self.paths.negotiated {
            Some(Target::Negotiated)
        } else if self.paths.swagger.as_deref() == Some(path) {
            Some(Target::Swagger)
        } else {
            None
        }
    }

    fn rendered(&self) -> Result<&Rendered, &DocsError> {
        self.rendered
            .get_or_init(|| render(self.document()))
            .as_ref()
    }

    fn serve(&self, format: BodyFormat) -> Response<Bytes> {
        let body = match format {
            BodyFormat::Yaml => self.yaml(),
            _ => self.json(),
        };
        match body {
            Ok(body) => document_response(format.content_type(), body),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize OpenAPI document");
                ErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal-error",
                    "the API document could not be serialized",
                )
                .into_response()
            }
        }
    }

    fn swagger_page(&self) -> Response<Bytes> {
        let html = self.swagger.get_or_init(|| {
            let title = &self.document().info.title;
            Bytes::from(SwaggerUi::new(self.paths.json.clone(), title).html())
        });
        document_response("text/html; charset=utf-8", html.clone())
    }
}

fn render(document: &OpenApi) -> DocsResult<Rendered> {
    let json = document.to_json()?;
    let yaml = document.to_yaml()?;
    tracing::debug!(json_bytes = json.len(), yaml_bytes = yaml.len(), "serialized OpenAPI document");
    Ok(Rendered {
        json: Bytes::from(json),
        yaml: Bytes::from(yaml),
    })
}

/// JSON unless the client prefers YAML; an `Accept` header that matches
/// neither still gets JSON.
fn negotiate_format(accept: Option<&str>) -> BodyFormat {
    let Ok(yaml) = APPLICATION_YAML.parse::<Mime>() else {
        return BodyFormat::Json;
    };
    let offers = [mime::APPLICATION_JSON, yaml];
    negotiate(accept, &offers)
        .and_then(BodyFormat::from_mime)
        .unwrap_or(BodyFormat::Json)
}

fn document_response(content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_format() {
        assert_eq!(negotiate_format(None), BodyFormat::Json);
        assert_eq!(negotiate_format(Some("application/yaml")), BodyFormat::Yaml);
        assert_eq!(
            negotiate_format(Some("application/json;q=0.2, application/yaml")),
            BodyFormat::Yaml
        );
        assert_eq!(negotiate_format(Some("text/html")), BodyFormat::Json);
    }

    #[test]
    fn test_default_paths() {
        let paths = DocumentPaths::default();
        assert_eq!(paths.json, "/openapi.json");
        assert_eq!(paths.yaml, "/openapi.yaml");
        assert_eq!(paths.negotiated, "/openapi");
        assert_eq!(paths.swagger.as_deref(), Some("/swagger"));
    }
}
