//! Structural validation of JSON values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::description::{PrimitiveKind, SchemaDescription};
use crate::inspector::SchemaArena;

/// One validation failure.
///
/// `field` is a `$`-rooted path such as `$.items[2].price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, crate::Describe)]
pub struct FieldViolation {
    /// Path of the offending value
    pub field: String,
    /// What is wrong
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates values against descriptions, resolving references through an
/// arena.
///
/// Unlike serde's deserializer, which stops at the first problem, the
/// validator reports every violation it finds. Unknown object fields are
/// ignored.
///
/// ```rust
/// use daedalus_schema::{Field, ObjectSchema, SchemaArena, SchemaDescription, Validator};
/// use serde_json::json;
///
/// let schema = SchemaDescription::Object(
///     ObjectSchema::new()
///         .with_field("name", Field::new(SchemaDescription::string()))
///         .with_field("price", Field::new(SchemaDescription::number(None)).optional()),
/// );
/// let arena = SchemaArena::default();
/// let validator = Validator::new(&arena);
///
/// assert!(validator.validate(&schema, &json!({"name": "apple"})).is_ok());
///
/// let violations = validator.validate(&schema, &json!({"price": 1.5})).unwrap_err();
/// assert_eq!(violations[0].field, "$.name");
/// assert_eq!(violations[0].message, "missing required property 'name'");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    arena: &'a SchemaArena,
}

impl<'a> Validator<'a> {
    /// Creates a validator over `arena`.
    pub fn new(arena: &'a SchemaArena) -> Self {
        Self { arena }
    }

    /// Validates `value` against `schema`.
    pub fn validate(
        &self,
        schema: &SchemaDescription,
        value: &Value,
    ) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        self.check(schema, value, "$", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check(
        &self,
        schema: &SchemaDescription,
        value: &Value,
        path: &str,
        out: &mut Vec<FieldViolation>,
    ) {
        let mismatch = |expected: &str| {
            FieldViolation::new(
                path,
                format!("expected {expected}, got {}", value_type_name(value)),
            )
        };

        match self.arena.resolve(schema) {
            SchemaDescription::Primitive { kind, range, .. } => {
                let ok = match kind {
                    PrimitiveKind::String => value.is_string(),
                    PrimitiveKind::Integer => value.is_i64() || value.is_u64(),
                    PrimitiveKind::Number => value.is_number(),
                    PrimitiveKind::Boolean => value.is_boolean(),
                };
                if !ok {
                    out.push(mismatch(kind.as_str()));
                    return;
                }
                if let (Some(range), Some(n)) = (range, integer_value(value)) {
                    if !range.contains(n) {
                        out.push(FieldViolation::new(
                            path,
                            format!("{n} is outside the range {}..={}", range.min, range.max),
                        ));
                    }
                }
            }

            SchemaDescription::Object(object) => {
                let Some(map) = value.as_object() else {
                    out.push(mismatch("object"));
                    return;
                };

                for (name, field) in object.iter() {
                    let field_path = format!("{path}.{name}");
                    match map.get(name) {
                        None if field.required => out.push(FieldViolation::new(
                            field_path,
                            format!("missing required property '{name}'"),
                        )),
                        Some(Value::Null) if field.required => out.push(FieldViolation::new(
                            field_path,
                            format!("required property '{name}' is null"),
                        )),
                        None | Some(Value::Null) => {}
                        Some(inner) => self.check(&field.schema, inner, &field_path, out),
                    }
                }
            }

            SchemaDescription::Array(items) => {
                let Some(elements) = value.as_array() else {
                    out.push(mismatch("array"));
                    return;
                };
                for (idx, element) in elements.iter().enumerate() {
                    self.check(items, element, &format!("{path}[{idx}]"), out);
                }
            }

            SchemaDescription::Map(values) => {
                let Some(map) = value.as_object() else {
                    out.push(mismatch("object"));
                    return;
                };
                for (key, inner) in map {
                    self.check(values, inner, &format!("{path}.{key}"), out);
                }
            }

            SchemaDescription::Enumeration(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => {}
                Some(s) => out.push(FieldViolation::new(
                    path,
                    format!("'{s}' is not one of: {}", allowed.join(", ")),
                )),
                None => out.push(mismatch("string")),
            },

            SchemaDescription::Unsupported { type_name, .. } => out.push(FieldViolation::new(
                path,
                format!("type {type_name} cannot be validated"),
            )),

            SchemaDescription::Any | SchemaDescription::Empty | SchemaDescription::Reference(_) => {}
        }
    }
}

fn integer_value(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

/// Human-readable JSON type name used in messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
