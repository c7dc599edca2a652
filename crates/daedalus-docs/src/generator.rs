//! Turns a built [`Api`] into an [`OpenApi`] document.
//!
//! Everything the generator reads was resolved when the routes were
//! registered, so generation is a pure walk over [`RouteInfo`] values and the
//! schema arena. Generating twice from the same `Api` yields equal documents.

use daedalus_core::{Api, ParamInfo, ResponseInfo, RouteInfo};
use daedalus_extract::{DEFAULT_REQUEST_MEDIA_TYPES, DEFAULT_RESPONSE_MEDIA_TYPES};
use daedalus_schema::{PrimitiveKind, SchemaDescription};
use http::StatusCode;
use indexmap::IndexMap;
use mime::Mime;

use crate::openapi::{
    Components, Example, Header, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn,
    PathItem, RequestBody, Response, Schema, Server, Tag, OPENAPI_VERSION,
};

/// Prefix of every component reference.
pub const COMPONENT_PREFIX: &str = "#/components/schemas/";

const ERROR_MEDIA_TYPE: &str = "application/json";

/// Generator for OpenAPI documents.
///
/// ```
/// use daedalus_core::{Annotation, HandlerError, Registry, RequestContext, Route};
/// use daedalus_docs::OpenApiGenerator;
///
/// async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<String>, HandlerError> {
///     Ok(vec!["apple".to_string()])
/// }
///
/// let mut registry = Registry::default();
/// registry
///     .group("fruits", "fruits", "Fruit catalogue")
///     .register(Route::get("", list).annotate(Annotation::summary("List fruits")));
/// let api = registry.build().unwrap();
///
/// let doc = OpenApiGenerator::new().title("Fruits").version("1.0.0").generate(&api);
/// let operation = doc.operation(&http::Method::GET, "/fruits").unwrap();
/// assert_eq!(operation.summary.as_deref(), Some("List fruits"));
/// assert_eq!(operation.tags, vec!["fruits"]);
/// ```
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    title: String,
    version: String,
    description: Option<String>,
    servers: Vec<Server>,
    default_error_responses: bool,
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "API".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            servers: Vec::new(),
            default_error_responses: true,
        }
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the API description. An empty description is left out.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Add a server.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>, description: Option<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description,
        });
        self
    }

    /// Whether to document the `400` and `500` error bodies every route can
    /// answer with. On by default.
    #[must_use]
    pub fn default_error_responses(mut self, enabled: bool) -> Self {
        self.default_error_responses = enabled;
        self
    }

    /// Generates the document.
    pub fn generate(&self, api: &Api) -> OpenApi {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        let error_schema = convert_schema(api.error_schema());

        for route in api.routes() {
            let operation = self.operation(route, &error_schema);
            let item = paths.entry(openapi_path(&route.path)).or_default();
            if item.insert(&route.method, operation).is_err() {
                tracing::warn!(
                    method = %route.method,
                    path = %route.path,
                    "method has no OpenAPI equivalent, route left out of the document"
                );
            }
        }

        let schemas: IndexMap<String, Schema> = api
            .schemas()
            .iter()
            .map(|named| (named.name().to_string(), convert_schema(named.schema())))
            .collect();
        let components = (!schemas.is_empty()).then_some(Components { schemas });

        let tags = api
            .tags()
            .iter()
            .map(|tag| Tag {
                name: tag.name.clone(),
                description: (!tag.description.is_empty()).then(|| tag.description.clone()),
            })
            .collect();

        tracing::debug!(
            paths = paths.len(),
            schemas = components.as_ref().map_or(0, |c| c.schemas.len()),
            "generated OpenAPI document"
        );

        OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
                description: self.description.clone(),
            },
            servers: self.servers.clone(),
            tags,
            paths,
            components,
        }
    }

    fn operation(&self, route: &RouteInfo, error_schema: &Schema) -> Operation {
        let parameters = route
            .path_params
            .iter()
            .map(|p| parameter(p, ParameterIn::Path))
            .chain(route.header_params.iter().map(|p| parameter(p, ParameterIn::Header)))
            .chain(route.query_params.iter().map(|p| parameter(p, ParameterIn::Query)))
            .collect();

        let request_body = route.body_schema().map(|schema| {
            let schema = convert_schema(schema);
            RequestBody {
                description: None,
                required: true,
                content: media_types(route.request_media.as_ref(), &DEFAULT_REQUEST_MEDIA_TYPES)
                    .into_iter()
                    .map(|media| {
                        let content = MediaType {
                            schema: Some(schema.clone()),
                            examples: IndexMap::new(),
                        };
                        (media, content)
                    })
                    .collect(),
            }
        });

        let mut responses: IndexMap<String, Response> = route
            .responses
            .iter()
            .map(|(status, info)| {
                let media = if *status == route.status {
                    media_types(route.response_media.as_ref(), &DEFAULT_RESPONSE_MEDIA_TYPES)
                } else {
                    vec![ERROR_MEDIA_TYPE.to_string()]
                };
                (status.as_str().to_string(), response(info, &media))
            })
            .collect();

        if self.default_error_responses {
            let bound = !route.input.is_empty() || route.bind_hooked;
            if bound {
                add_error_response(&mut responses, route.bind_error_status, error_schema);
            }
            add_error_response(&mut responses, StatusCode::INTERNAL_SERVER_ERROR, error_schema);
        }

        Operation {
            operation_id: route.operation_id.clone(),
            summary: route.summary.clone(),
            description: route.description.clone(),
            tags: route.tags.clone(),
            deprecated: route.deprecated,
            parameters,
            request_body,
            responses,
        }
    }
}

/// Converts a schema description into an OpenAPI schema. Named types become
/// `$ref`s into `#/components/schemas`.
pub fn convert_schema(schema: &SchemaDescription) -> Schema {
    match schema {
        SchemaDescription::Primitive { kind, format, .. } => {
            let schema = match kind {
                PrimitiveKind::String => Schema::string(),
                PrimitiveKind::Integer => Schema::integer(),
                PrimitiveKind::Number => Schema::number(),
                PrimitiveKind::Boolean => Schema::boolean(),
            };
            match format {
                Some(format) => schema.with_format(*format),
                None => schema,
            }
        }
        SchemaDescription::Object(object) => {
            let mut result = Schema::object();
            for (name, field) in object.iter() {
                let mut property = convert_schema(&field.schema);
                if let Some(description) = &field.description {
                    property.description = Some(description.clone());
                }
                result.properties.insert(name.to_string(), property);
            }
            result.required = object
                .required_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            result
        }
        SchemaDescription::Array(items) => Schema::array(convert_schema(items)),
        SchemaDescription::Map(values) => Schema {
            additional_properties: Some(Box::new(convert_schema(values))),
            ..Schema::object()
        },
        SchemaDescription::Enumeration(values) => Schema {
            enum_values: values
                .iter()
                .map(|v| serde_json::Value::String(v.clone()))
                .collect(),
            ..Schema::string()
        },
        SchemaDescription::Reference(name) => Schema::reference(format!("{COMPONENT_PREFIX}{name}")),
        SchemaDescription::Any | SchemaDescription::Empty => Schema::default(),
        SchemaDescription::Unsupported { type_name, reason } => {
            Schema::default().with_description(format!("{type_name}: {reason}"))
        }
    }
}

/// Rewrites a route template for OpenAPI: a trailing `*rest` wildcard
/// becomes `{rest}`.
pub fn openapi_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix('*') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn parameter(param: &ParamInfo, location: ParameterIn) -> Parameter {
    Parameter {
        name: param.name.clone(),
        location,
        description: param.description.clone(),
        required: location == ParameterIn::Path || param.required,
        schema: Some(convert_schema(&param.schema)),
    }
}

fn media_types(overridden: Option<&Mime>, defaults: &[&str]) -> Vec<String> {
    match overridden {
        Some(media) => vec![media.essence_str().to_string()],
        None => defaults.iter().map(|m| (*m).to_string()).collect(),
    }
}

fn response(info: &ResponseInfo, media: &[String]) -> Response {
    let examples: IndexMap<String, Example> = info
        .examples
        .iter()
        .map(|(name, value)| (name.clone(), Example { value: value.clone() }))
        .collect();

    let schema = info.schema.as_ref().map(convert_schema);
    let content = if schema.is_some() || !examples.is_empty() {
        media
            .iter()
            .map(|m| {
                let content = MediaType {
                    schema: schema.clone(),
                    examples: examples.clone(),
                };
                (m.clone(), content)
            })
            .collect()
    } else {
        IndexMap::new()
    };

    let headers = info
        .headers
        .iter()
        .map(|(name, header)| {
            let header = Header {
                description: Some(header.description.clone()),
                schema: Some(convert_schema(&header.schema)),
            };
            (name.clone(), header)
        })
        .collect();

    Response {
        description: info.description.clone(),
        headers,
        content,
    }
}

fn add_error_response(responses: &mut IndexMap<String, Response>, status: StatusCode, schema: &Schema) {
    responses
        .entry(status.as_str().to_string())
        .or_insert_with(|| Response {
            description: status.canonical_reason().unwrap_or("Error").to_string(),
            headers: IndexMap::new(),
            content: IndexMap::from([(
                ERROR_MEDIA_TYPE.to_string(),
                MediaType {
                    schema: Some(schema.clone()),
                    examples: IndexMap::new(),
                },
            )]),
        });
}
