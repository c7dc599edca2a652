//! Coercion of textual values (path segments, form fields) into JSON values.

use serde_json::{Number, Value};

use crate::description::{PrimitiveKind, SchemaDescription};
use crate::inspector::SchemaArena;

/// Converts a raw string into the JSON value `schema` expects.
///
/// Values that do not parse are kept as strings so that validation reports a
/// precise type mismatch instead of the coercion silently dropping them.
///
/// ```rust
/// use daedalus_schema::{coerce_scalar, SchemaArena, SchemaDescription};
/// use serde_json::json;
///
/// let arena = SchemaArena::default();
/// assert_eq!(coerce_scalar(&SchemaDescription::integer(None), &arena, "42"), json!(42));
/// assert_eq!(coerce_scalar(&SchemaDescription::integer(None), &arena, "4x"), json!("4x"));
/// assert_eq!(coerce_scalar(&SchemaDescription::boolean(), &arena, "true"), json!(true));
/// ```
pub fn coerce_scalar(schema: &SchemaDescription, arena: &SchemaArena, raw: &str) -> Value {
    match arena.resolve(schema) {
        SchemaDescription::Primitive {
            kind: PrimitiveKind::Integer,
            ..
        } => raw
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| raw.parse::<u64>().map(Value::from))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        SchemaDescription::Primitive {
            kind: PrimitiveKind::Number,
            ..
        } => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(raw.to_string()), Value::Number),
        SchemaDescription::Primitive {
            kind: PrimitiveKind::Boolean,
            ..
        } => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        SchemaDescription::Array(items) => {
            Value::Array(vec![coerce_scalar(items, arena, raw)])
        }
        _ => Value::String(raw.to_string()),
    }
}

/// Converts one or more raw values for the same key.
///
/// An array schema collects every value; any other schema takes the last one,
/// matching how repeated query keys usually override each other.
pub fn coerce_values(schema: &SchemaDescription, arena: &SchemaArena, raw: &[&str]) -> Value {
    match arena.resolve(schema) {
        SchemaDescription::Array(items) => Value::Array(
            raw.iter()
                .map(|value| coerce_scalar(items, arena, value))
                .collect(),
        ),
        _ => raw
            .last()
            .map_or(Value::Null, |value| coerce_scalar(schema, arena, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_and_unsigned() {
        let arena = SchemaArena::default();
        assert_eq!(coerce_scalar(&SchemaDescription::number(None), &arena, "1.5"), json!(1.5));
        assert_eq!(
            coerce_scalar(&SchemaDescription::integer(None), &arena, "18446744073709551615"),
            json!(u64::MAX)
        );
    }

    #[test]
    fn test_non_finite_number_stays_text() {
        let arena = SchemaArena::default();
        assert_eq!(coerce_scalar(&SchemaDescription::number(None), &arena, "NaN"), json!("NaN"));
    }

    #[test]
    fn test_strings_untouched() {
        let arena = SchemaArena::default();
        assert_eq!(coerce_scalar(&SchemaDescription::string(), &arena, "007"), json!("007"));
        assert_eq!(coerce_scalar(&SchemaDescription::Any, &arena, "x"), json!("x"));
    }

    #[test]
    fn test_repeated_values() {
        let arena = SchemaArena::default();
        let tags = SchemaDescription::array(SchemaDescription::integer(None));
        assert_eq!(coerce_values(&tags, &arena, &["1", "2"]), json!([1, 2]));
        assert_eq!(
            coerce_values(&SchemaDescription::string(), &arena, &["a", "b"]),
            json!("b")
        );
        assert_eq!(coerce_values(&SchemaDescription::string(), &arena, &[]), Value::Null);
    }
}
