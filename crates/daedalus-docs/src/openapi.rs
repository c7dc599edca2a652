//! The OpenAPI 3.1 object model, reduced to what the generator emits.
//!
//! Field names follow <https://spec.openapis.org/oas/v3.1.0>; empty members
//! are left out of the output so documents stay small and diffable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DocsResult;

/// The OpenAPI version every generated document declares.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// A whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    /// Always [`OPENAPI_VERSION`] for generated documents.
    pub openapi: String,
    /// Title and version.
    pub info: Info,
    /// Base URLs, in preference order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// One entry per route group, in registration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Keyed by path template, `{param}` style.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Named schemas referenced by `$ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl OpenApi {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// YAML.
    pub fn to_yaml(&self) -> DocsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The operation documented for `method` on the path template `path`.
    pub fn operation(&self, method: &http::Method, path: &str) -> Option<&Operation> {
        self.paths.get(path)?.get(method)
    }
}

/// Title, version and blurb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A base URL the API is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Server URL.
    pub url: String,
    /// Server description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The operations of one path, keyed by lowercase method name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathItem {
    operations: IndexMap<String, Operation>,
}

/// Methods a path item has a field for.
const PATH_ITEM_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

impl PathItem {
    fn key(method: &http::Method) -> Option<&'static str> {
        PATH_ITEM_METHODS
            .into_iter()
            .find(|key| key.eq_ignore_ascii_case(method.as_str()))
    }

    /// Sets the operation for `method`. Extension methods such as `PURGE`
    /// have no field in a path item and are handed back.
    ///
    /// # Errors
    ///
    /// Returns `operation` unchanged when `method` cannot be represented.
    pub fn insert(&mut self, method: &http::Method, operation: Operation) -> Result<(), Operation> {
        match Self::key(method) {
            Some(key) => {
                self.operations.insert(key.to_string(), operation);
                Ok(())
            }
            None => Err(operation),
        }
    }

    /// The operation for `method`.
    pub fn get(&self, method: &http::Method) -> Option<&Operation> {
        self.operations.get(Self::key(method)?)
    }

    /// `(method, operation)` pairs in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations.iter().map(|(m, op)| (m.as_str(), op))
    }
}

/// One method on one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique across the document.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags for grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Whether deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    /// Responses by status code.
    pub responses: IndexMap<String, Response>,
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Query string parameter.
    Query,
    /// URL path parameter.
    Path,
    /// HTTP header.
    Header,
    /// Cookie.
    Cookie,
}

/// A path, query or header parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// What a route accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

/// Schema and examples for one media type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

/// A named example value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// The example payload.
    pub value: serde_json::Value,
}

/// One documented status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description (required).
    pub description: String,
    /// Response headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    /// Response content by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// A header a response may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// The `components` section; only schemas are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Reusable schemas.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

/// A named group of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// Null type.
    Null,
}

/// A JSON Schema, limited to the keywords the inspector can produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Schema format (e.g., "int64", "double").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to a component schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Value schema of a string-keyed map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<Box<Schema>>,
    /// Enum values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "enum")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Schema {
    /// `{"type": "string"}`
    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    /// `{"type": "integer"}`
    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer)
    }

    /// `{"type": "number"}`
    #[must_use]
    pub fn number() -> Self {
        Self::typed(SchemaType::Number)
    }

    /// `{"type": "boolean"}`
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean)
    }

    /// An array of `items`.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// An object with no declared properties yet.
    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object)
    }

    /// A `$ref` to `ref_path`.
    #[must_use]
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self {
            reference: Some(ref_path.into()),
            ..Default::default()
        }
    }

    /// Add a format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builders() {
        assert_eq!(Schema::string().schema_type, Some(SchemaType::String));
        assert_eq!(Schema::integer().schema_type, Some(SchemaType::Integer));

        let array = Schema::array(Schema::string());
        assert_eq!(array.schema_type, Some(SchemaType::Array));
        assert!(array.items.is_some());

        let reference = Schema::reference("#/components/schemas/Fruit");
        assert!(reference.schema_type.is_none());
    }

    #[test]
    fn test_schema_serialization_skips_empty_members() {
        let schema = Schema::integer().with_format("int64");
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "format": "int64"}));

        let reference = serde_json::to_value(Schema::reference("#/components/schemas/Fruit")).unwrap();
        assert_eq!(reference, serde_json::json!({"$ref": "#/components/schemas/Fruit"}));
    }

    #[test]
    fn test_operation_field_names() {
        let operation = Operation {
            operation_id: "get_fruits".to_string(),
            summary: Some("List fruits".to_string()),
            description: None,
            tags: vec!["market".to_string()],
            deprecated: false,
            parameters: vec![Parameter {
                name: "id".to_string(),
                location: ParameterIn::Path,
                description: None,
                required: true,
                schema: Some(Schema::string()),
            }],
            request_body: None,
            responses: IndexMap::new(),
        };

        let json = serde_json::to_value(&operation).unwrap();
        assert_eq!(json["operationId"], "get_fruits");
        assert_eq!(json["parameters"][0]["in"], "path");
        assert!(json.get("deprecated").is_none());
        assert!(json.get("requestBody").is_none());
    }

    #[test]
    fn test_path_item_keys_by_method() {
        let operation = |id: &str| Operation {
            operation_id: id.to_string(),
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
        };
        let mut item = PathItem::default();
        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        assert!(item.insert(&purge, operation("purge_fruit")).is_err());
        item.insert(&http::Method::PATCH, operation("patch_fruit")).unwrap();
        item.insert(&http::Method::GET, operation("get_fruit")).unwrap();

        assert_eq!(item.get(&http::Method::PATCH).unwrap().operation_id, "patch_fruit");
        assert!(item.get(&http::Method::PUT).is_none());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["get"]["operationId"], "get_fruit");
        assert_eq!(item.operations().map(|(m, _)| m).collect::<Vec<_>>(), ["patch", "get"]);
    }

    #[test]
    fn test_document_round_trips_through_yaml() {
        let doc = OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: "Fruits".to_string(),
                version: "1.0.0".to_string(),
                description: None,
            },
            servers: Vec::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
            components: None,
        };
        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.contains("openapi: 3.1.0"));
        let back: OpenApi = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, doc);
    }
}
