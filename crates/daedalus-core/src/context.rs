//! What a handler knows besides its input.

use std::fmt;
use std::str::FromStr;

use daedalus_extract::{parse_query, BindError};
use http::request::Parts;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request and response header carrying the [`RequestId`].
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlates the log lines and the response of one request.
///
/// A v7 UUID, so ids sort by arrival time. Clients may supply their own
/// through `x-request-id`; anything that is not a UUID is replaced.
///
/// ```
/// use daedalus_core::RequestId;
///
/// let id: RequestId = "0190b6c4-1f9e-7b5a-9c3e-2d4f6a8b0c1d".parse().unwrap();
/// assert_eq!(id.to_string(), "0190b6c4-1f9e-7b5a-9c3e-2d4f6a8b0c1d");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// A fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The incoming `x-request-id` if it parses, a fresh id otherwise.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Handed to every handler next to its bound input.
///
/// Holds copies of the request line and headers, so a handler can read them
/// after the body has been consumed by binding.
///
/// ```
/// use daedalus_core::RequestContext;
///
/// let ctx = RequestContext::mock().with_operation_id("list_fruits");
/// assert_eq!(ctx.method(), "GET");
/// assert_eq!(ctx.operation_id(), Some("list_fruits"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: RequestId,
    operation_id: Option<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestContext {
    /// A context for the request described by `parts`.
    #[must_use]
    pub fn from_parts(id: RequestId, parts: &Parts) -> Self {
        Self {
            id,
            operation_id: None,
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }

    /// `GET /`, no headers, fresh id.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            id: RequestId::new(),
            operation_id: None,
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
        }
    }

    /// Records which route matched.
    #[must_use]
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Echoed back in the `x-request-id` response header.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.id
    }

    /// `None` only for contexts built outside the dispatcher.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target, query included.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header as text; `None` if absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decodes the query string into `T`.
    ///
    /// # Errors
    ///
    /// A decode [`BindError`] when the query does not fit `T`.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        parse_query(self.uri.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    #[test]
    fn test_fresh_ids_are_v7_and_distinct() {
        let id = RequestId::new();
        assert_eq!(id.uuid().get_version_num(), 7);
        assert_ne!(id, RequestId::new());
    }

    #[test]
    fn test_incoming_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, " 0190b6c4-1f9e-7b5a-9c3e-2d4f6a8b0c1d".parse().unwrap());
        assert_eq!(
            RequestId::from_headers(&headers).to_string(),
            "0190b6c4-1f9e-7b5a-9c3e-2d4f6a8b0c1d"
        );

        headers.insert(REQUEST_ID_HEADER, "not-a-uuid".parse().unwrap());
        assert_eq!(RequestId::from_headers(&headers).uuid().get_version_num(), 7);
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = RequestId::from(Uuid::nil());
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"00000000-0000-0000-0000-000000000000\""
        );
    }

    #[test]
    fn test_from_parts() {
        let (parts, ()) = Request::get("/market?limit=5")
            .header("x-market", "north")
            .body(())
            .unwrap()
            .into_parts();
        let ctx = RequestContext::from_parts(RequestId::new(), &parts);

        #[derive(Deserialize)]
        struct Page {
            limit: u32,
        }
        let page: Page = ctx.query().unwrap();
        assert_eq!(page.limit, 5);
        assert_eq!(ctx.header("x-market"), Some("north"));
        assert_eq!(ctx.operation_id(), None);
    }
}
