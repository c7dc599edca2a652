//! Request binding.
//!
//! A [`Binder`] turns an [`ExtractionContext`] into a handler's input value.
//! Routes use [`DefaultBinder`] unless they install a hook; the default runs
//! a fixed pipeline:
//!
//! 1. reject bodies over the size limit (413)
//! 2. pick the media type: route override, then `Content-Type`, then JSON (415
//!    for anything it cannot decode)
//! 3. decode into a JSON value (an empty body is `{}` for object inputs)
//! 4. merge path parameters, coerced by the input schema
//! 5. validate against the input schema, collecting every violation
//! 6. deserialize into the input type
//!
//! Inputs described as empty (`()`) skip every step.

use std::fmt;
use std::marker::PhantomData;

use daedalus_schema::{
    coerce_scalar, coerce_values, FieldViolation, ObjectSchema, SchemaArena, SchemaDescription,
    Validator,
};
use http::StatusCode;
use mime::Mime;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::ExtractionContext;
use crate::error::BindError;
use crate::media::{BodyFormat, DEFAULT_REQUEST_MEDIA_TYPES};
use crate::query::group_pairs;

/// Default body limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Produces a handler input from a raw request.
///
/// Implementations are fully responsible for the value: a custom binder that
/// accepts a request bypasses schema validation entirely.
pub trait Binder<T>: Send + Sync + 'static {
    /// Binds the request, or rejects it.
    fn bind(&self, request: &ExtractionContext, schemas: &SchemaArena) -> Result<T, BindError>;
}

/// Adapts a closure into a [`Binder`].
///
/// ```rust
/// use daedalus_extract::{BindError, Binder, ExtractionContext, FnBinder};
/// use daedalus_schema::SchemaArena;
///
/// let shout = FnBinder::new(|req: &ExtractionContext| {
///     std::str::from_utf8(req.body())
///         .map(str::to_uppercase)
///         .map_err(|e| BindError::decode(e.to_string()))
/// });
///
/// let req = ExtractionContext::builder().body("hello").build();
/// assert_eq!(shout.bind(&req, &SchemaArena::default()).unwrap(), "HELLO");
/// ```
pub struct FnBinder<F> {
    f: F,
}

impl<F> FnBinder<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnBinder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBinder").finish_non_exhaustive()
    }
}

impl<T, F> Binder<T> for FnBinder<F>
where
    F: Fn(&ExtractionContext) -> Result<T, BindError> + Send + Sync + 'static,
{
    fn bind(&self, request: &ExtractionContext, _schemas: &SchemaArena) -> Result<T, BindError> {
        (self.f)(request)
    }
}

/// Settings of the default binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    /// Status for decode and validation failures.
    ///
    /// Not applied to oversized bodies (always 413) or to media types the
    /// binder cannot decode (always 415).
    pub error_status: StatusCode,
    /// Largest accepted body.
    pub max_body_bytes: usize,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            error_status: StatusCode::BAD_REQUEST,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// The schema-driven binder.
///
/// Built once per route at registration, holding the input type's
/// description; the arena it references is passed at bind time.
pub struct DefaultBinder<T> {
    schema: SchemaDescription,
    config: BindConfig,
    media_override: Option<Mime>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for DefaultBinder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultBinder")
            .field("schema", &self.schema)
            .field("config", &self.config)
            .field("media_override", &self.media_override)
            .finish()
    }
}

impl<T> DefaultBinder<T> {
    /// Creates a binder for an input described by `schema`.
    pub fn new(schema: SchemaDescription, config: BindConfig) -> Self {
        Self {
            schema,
            config,
            media_override: None,
            _marker: PhantomData,
        }
    }

    /// Only accepts `media` as the request body type.
    #[must_use]
    pub fn with_media_type(mut self, media: Mime) -> Self {
        self.media_override = Some(media);
        self
    }

    /// The input schema.
    pub fn schema(&self) -> &SchemaDescription {
        &self.schema
    }

    fn fail(&self, err: BindError) -> BindError {
        err.with_status(self.config.error_status)
    }

    fn format_for(&self, request: &ExtractionContext) -> Result<BodyFormat, BindError> {
        let declared = request.content_type();
        let parsed = declared.map(str::parse::<Mime>);

        if let Some(expected) = &self.media_override {
            let format = BodyFormat::from_mime(expected).ok_or_else(|| {
                BindError::unsupported_media_type(expected.essence_str(), declared)
            })?;
            return match parsed {
                Some(Ok(actual)) if actual.essence_str() != expected.essence_str() => Err(
                    BindError::unsupported_media_type(expected.essence_str(), declared),
                ),
                Some(Err(_)) => Err(BindError::unsupported_media_type(
                    expected.essence_str(),
                    declared,
                )),
                _ => Ok(format),
            };
        }

        match parsed {
            None => Ok(BodyFormat::Json),
            Some(Ok(actual)) => BodyFormat::from_mime(&actual).ok_or_else(|| {
                BindError::unsupported_media_type(
                    &DEFAULT_REQUEST_MEDIA_TYPES.join(", "),
                    declared,
                )
            }),
            Some(Err(_)) => Err(BindError::unsupported_media_type(
                &DEFAULT_REQUEST_MEDIA_TYPES.join(", "),
                declared,
            )),
        }
    }

    fn decode(
        &self,
        format: BodyFormat,
        request: &ExtractionContext,
        schemas: &SchemaArena,
    ) -> Result<Value, BindError> {
        let body = request.body();
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(match schemas.resolve(&self.schema) {
                SchemaDescription::Object(_) | SchemaDescription::Map(_) => {
                    Value::Object(Map::new())
                }
                _ => Value::Null,
            });
        }

        match format {
            BodyFormat::Json => serde_json::from_slice(body)
                .map_err(|e| self.fail(BindError::decode(format!("invalid JSON body: {e}")))),
            BodyFormat::Yaml => serde_yaml::from_slice(body)
                .map_err(|e| self.fail(BindError::decode(format!("invalid YAML body: {e}")))),
            BodyFormat::Form => {
                let grouped = group_pairs(body).map_err(|e| self.fail(e))?;
                Ok(Value::Object(self.coerce_form(grouped, schemas)))
            }
            BodyFormat::Text => std::str::from_utf8(body)
                .map(|text| Value::String(text.to_string()))
                .map_err(|e| self.fail(BindError::decode(format!("body is not UTF-8: {e}")))),
        }
    }

    fn object_schema<'a>(&'a self, schemas: &'a SchemaArena) -> Option<&'a ObjectSchema> {
        schemas.resolve(&self.schema).as_object()
    }

    fn coerce_form(
        &self,
        grouped: Vec<(String, Vec<String>)>,
        schemas: &SchemaArena,
    ) -> Map<String, Value> {
        let object = self.object_schema(schemas);
        grouped
            .into_iter()
            .map(|(key, values)| {
                let raw: Vec<&str> = values.iter().map(String::as_str).collect();
                let value = match object.and_then(|o| o.get(&key)) {
                    Some(field) => coerce_values(&field.schema, schemas, &raw),
                    None if values.len() == 1 => Value::String(values[0].clone()),
                    None => Value::Array(values.into_iter().map(Value::String).collect()),
                };
                (key, value)
            })
            .collect()
    }

    fn merge_path_params(
        &self,
        value: &mut Value,
        request: &ExtractionContext,
        schemas: &SchemaArena,
    ) {
        let params = request.path_params();
        if params.is_empty() {
            return;
        }
        if value.is_null() {
            *value = Value::Object(Map::new());
        }
        let Some(map) = value.as_object_mut() else {
            return;
        };

        let object = self.object_schema(schemas);
        for (name, raw) in params.iter() {
            let coerced = match object.and_then(|o| o.get(name)) {
                Some(field) => coerce_scalar(&field.schema, schemas, raw),
                None => Value::String(raw.to_string()),
            };
            map.insert(name.to_string(), coerced);
        }
    }
}

impl<T> Binder<T> for DefaultBinder<T>
where
    T: DeserializeOwned + 'static,
{
    fn bind(&self, request: &ExtractionContext, schemas: &SchemaArena) -> Result<T, BindError> {
        if self.schema.is_empty() {
            return serde_json::from_value(Value::Null)
                .map_err(|e| self.fail(BindError::decode(e.to_string())));
        }

        let size = request.body().len();
        if size > self.config.max_body_bytes {
            return Err(BindError::payload_too_large(self.config.max_body_bytes, size));
        }

        let format = self.format_for(request)?;
        let mut value = self.decode(format, request, schemas)?;
        self.merge_path_params(&mut value, request, schemas);

        Validator::new(schemas)
            .validate(&self.schema, &value)
            .map_err(|violations| self.fail(BindError::validation(violations)))?;

        serde_json::from_value(value).map_err(|e| {
            self.fail(BindError::validation(vec![FieldViolation::new(
                "$",
                e.to_string(),
            )]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindErrorKind;
    use daedalus_schema::{Describe, Inspector};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Describe)]
    struct NewFruit {
        name: String,
        price: Option<f64>,
    }

    fn binder<T: Describe>() -> (DefaultBinder<T>, SchemaArena) {
        let mut inspector = Inspector::default();
        let schema = inspector.describe::<T>();
        (
            DefaultBinder::new(schema, BindConfig::default()),
            inspector.into_arena(),
        )
    }

    #[test]
    fn test_json_default_without_content_type() {
        let (binder, arena) = binder::<NewFruit>();
        let req = ExtractionContext::builder()
            .body(r#"{"name":"kiwi","price":0.5}"#)
            .build();
        let fruit = binder.bind(&req, &arena).unwrap();
        assert_eq!(fruit.name, "kiwi");
        assert_eq!(fruit.price, Some(0.5));
    }

    #[test]
    fn test_unit_input_ignores_body() {
        let (binder, arena) = binder::<()>();
        let req = ExtractionContext::builder()
            .header("content-type", "image/png")
            .body(vec![0u8; 16])
            .build();
        assert!(binder.bind(&req, &arena).is_ok());
    }

    #[test]
    fn test_empty_body_fails_validation_not_decode() {
        let (binder, arena) = binder::<NewFruit>();
        let err = binder
            .bind(&ExtractionContext::builder().build(), &arena)
            .unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::Validation);
        assert_eq!(err.violations()[0].field, "$.name");
    }

    #[test]
    fn test_configured_status() {
        let mut inspector = Inspector::default();
        let schema = inspector.describe::<NewFruit>();
        let binder: DefaultBinder<NewFruit> = DefaultBinder::new(
            schema,
            BindConfig {
                error_status: StatusCode::UNPROCESSABLE_ENTITY,
                max_body_bytes: 16,
            },
        );
        let req = ExtractionContext::builder().body("{").build();
        let err = binder.bind(&req, inspector.arena()).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::Decode);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let csv = ExtractionContext::builder()
            .header("content-type", "text/csv")
            .body("fig")
            .build();
        let err = binder.bind(&csv, inspector.arena()).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let big = ExtractionContext::builder().body(vec![b' '; 17]).build();
        let err = binder.bind(&big, inspector.arena()).unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_override_rejects_other_content_type() {
        let (binder, arena) = binder::<NewFruit>();
        let binder = binder.with_media_type("application/yaml".parse().unwrap());

        let yaml = ExtractionContext::builder()
            .header("content-type", "application/yaml")
            .body("name: fig\n")
            .build();
        assert_eq!(binder.bind(&yaml, &arena).unwrap().name, "fig");

        let undeclared = ExtractionContext::builder().body("name: plum\n").build();
        assert_eq!(binder.bind(&undeclared, &arena).unwrap().name, "plum");

        let json = ExtractionContext::builder()
            .header("content-type", "application/json")
            .body(r#"{"name":"fig"}"#)
            .build();
        let err = binder.bind(&json, &arena).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_size_limit() {
        let mut inspector = Inspector::default();
        let schema = inspector.describe::<NewFruit>();
        let binder: DefaultBinder<NewFruit> = DefaultBinder::new(
            schema,
            BindConfig {
                max_body_bytes: 8,
                ..BindConfig::default()
            },
        );
        let req = ExtractionContext::builder()
            .body(r#"{"name":"watermelon"}"#)
            .build();
        let err = binder.bind(&req, inspector.arena()).unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_fn_binder_skips_validation() {
        let hook = FnBinder::new(|_: &ExtractionContext| {
            Ok::<_, BindError>(NewFruit {
                name: String::new(),
                price: None,
            })
        });
        let fruit: NewFruit = hook
            .bind(&ExtractionContext::builder().body("{").build(), &SchemaArena::default())
            .unwrap();
        assert!(fruit.name.is_empty());
    }
}
