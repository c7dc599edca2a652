//! Frozen route descriptions.
//!
//! Everything documentation needs about a route is resolved when the route
//! is registered: schemas are described, annotations folded, responses
//! merged. Document generators only read these values.

use daedalus_schema::SchemaDescription;
use http::{Method, StatusCode};
use indexmap::IndexMap;
use mime::Mime;
use serde_json::Value;

/// Identifies a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    /// Position in registration order across the whole registry.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A documented request parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// Parameter name
    pub name: String,
    /// Description, if any
    pub description: Option<String>,
    /// Value schema
    pub schema: SchemaDescription,
    /// Whether it must be present
    pub required: bool,
}

/// A documented response header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderInfo {
    /// Description
    pub description: String,
    /// Value schema
    pub schema: SchemaDescription,
}

/// A documented response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    /// Description
    pub description: String,
    /// Body schema; `None` for responses without content
    pub schema: Option<SchemaDescription>,
    /// Headers by name
    pub headers: IndexMap<String, HeaderInfo>,
    /// Named examples
    pub examples: IndexMap<String, Value>,
}

impl ResponseInfo {
    /// A response with only a description and optional body.
    pub fn new(description: impl Into<String>, schema: Option<SchemaDescription>) -> Self {
        Self {
            description: description.into(),
            schema,
            headers: IndexMap::new(),
            examples: IndexMap::new(),
        }
    }

    /// Adds `other` to this response without replacing what is already
    /// documented: only headers and examples that are not present yet are
    /// taken.
    pub fn absorb(&mut self, other: Self) {
        for (name, header) in other.headers {
            self.headers.entry(name).or_insert(header);
        }
        for (name, example) in other.examples {
            self.examples.entry(name).or_insert(example);
        }
    }
}

/// Merges annotation responses into a route's responses.
///
/// A new status is added in annotation order; an existing status keeps its
/// description and schema and only gains headers and examples.
pub fn merge_responses(
    responses: &mut IndexMap<StatusCode, ResponseInfo>,
    additions: impl IntoIterator<Item = (StatusCode, ResponseInfo)>,
) {
    for (status, response) in additions {
        match responses.get_mut(&status) {
            Some(existing) => existing.absorb(response),
            None => {
                responses.insert(status, response);
            }
        }
    }
}

/// A route group tag with its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Group description
    pub description: String,
}

/// Everything known about a registered route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    /// Route id
    pub id: RouteId,
    /// HTTP method
    pub method: Method,
    /// Full path template, including group prefixes
    pub path: String,
    /// Operation id, derived from method and path unless annotated
    pub operation_id: String,
    /// Last `Summary` annotation
    pub summary: Option<String>,
    /// Last `Description` annotation
    pub description: Option<String>,
    /// Group tags outermost first, then `Tag` annotations, deduplicated
    pub tags: Vec<String>,
    /// Whether a `Deprecated` annotation is present
    pub deprecated: bool,
    /// Success status
    pub status: StatusCode,
    /// Schema of the bound input; `Empty` for `()`
    pub input: SchemaDescription,
    /// Schema of the `InputModel` annotation, which documents the body in
    /// place of `input`
    pub input_model: Option<SchemaDescription>,
    /// Schema of the handler output; `Empty` for `()`
    pub output: SchemaDescription,
    /// Path parameters in template order
    pub path_params: Vec<ParamInfo>,
    /// Header parameters
    pub header_params: Vec<ParamInfo>,
    /// Query parameters
    pub query_params: Vec<ParamInfo>,
    /// Responses, the success status first
    pub responses: IndexMap<StatusCode, ResponseInfo>,
    /// Request media type override
    pub request_media: Option<Mime>,
    /// Response media type override
    pub response_media: Option<Mime>,
    /// Whether binding is done by a hook
    pub bind_hooked: bool,
    /// Status the default binder rejects undecodable or invalid input with;
    /// hooks choose their own, 400 unless they say otherwise
    pub bind_error_status: StatusCode,
    /// Whether rendering is done by a hook
    pub render_hooked: bool,
}

impl RouteInfo {
    /// The schema documenting the request body, if there is one.
    pub fn body_schema(&self) -> Option<&SchemaDescription> {
        match &self.input_model {
            Some(model) => Some(model),
            None if self.input.is_empty() => None,
            None => Some(&self.input),
        }
    }
}

/// Derives an operation id from method and path: `GET /fruits/{id}`
/// becomes `get_fruits_by_id`.
pub(crate) fn derive_operation_id(method: &Method, path: &str) -> String {
    let mut id = method.as_str().to_ascii_lowercase();
    let mut empty = true;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let (prefix, name) = match segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .or_else(|| segment.strip_prefix('*'))
        {
            Some(param) => ("by_", param),
            None => ("", segment),
        };
        id.push('_');
        id.push_str(prefix);
        id.extend(name.chars().map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        }));
        empty = false;
    }
    if empty {
        id.push_str("_root");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_ids() {
        assert_eq!(derive_operation_id(&Method::GET, "/fruits/{id}"), "get_fruits_by_id");
        assert_eq!(derive_operation_id(&Method::POST, "/market"), "post_market");
        assert_eq!(derive_operation_id(&Method::GET, "/"), "get_root");
        assert_eq!(
            derive_operation_id(&Method::DELETE, "/market/{name}/price-override"),
            "delete_market_by_name_price_override"
        );
        assert_eq!(derive_operation_id(&Method::GET, "/files/*rest"), "get_files_by_rest");
    }

    #[test]
    fn test_merge_is_additive() {
        let mut responses = IndexMap::new();
        responses.insert(
            StatusCode::OK,
            ResponseInfo::new("OK", Some(SchemaDescription::string())),
        );

        let mut ok_again = ResponseInfo::new("Something else", None);
        ok_again
            .examples
            .insert("sample".to_string(), serde_json::json!("apple"));

        merge_responses(
            &mut responses,
            [
                (StatusCode::OK, ok_again),
                (StatusCode::BAD_REQUEST, ResponseInfo::new("Bad request", None)),
            ],
        );

        let ok = &responses[&StatusCode::OK];
        assert_eq!(ok.description, "OK");
        assert_eq!(ok.schema, Some(SchemaDescription::string()));
        assert_eq!(ok.examples["sample"], "apple");
        assert_eq!(
            responses.keys().copied().collect::<Vec<_>>(),
            vec![StatusCode::OK, StatusCode::BAD_REQUEST]
        );
    }
}
