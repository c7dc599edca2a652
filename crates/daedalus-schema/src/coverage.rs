//! Type-coverage check.
//!
//! Finds every [`SchemaDescription::Unsupported`] node reachable from a
//! description so registration can refuse routes whose types the default
//! binder or renderer could not handle.

use std::collections::HashSet;

use crate::description::SchemaDescription;
use crate::error::SchemaError;
use crate::inspector::SchemaArena;

/// Walks `schema` (following references once each) and reports unsupported
/// types with their location.
///
/// ```rust
/// use daedalus_schema::{check_coverage, SchemaArena, SchemaDescription};
///
/// let arena = SchemaArena::default();
/// let schema = SchemaDescription::array(SchemaDescription::unsupported("(u8, u8)", "tuple"));
/// let gaps = check_coverage(&schema, &arena);
/// assert_eq!(gaps.len(), 1);
/// ```
pub fn check_coverage(schema: &SchemaDescription, arena: &SchemaArena) -> Vec<SchemaError> {
    let mut gaps = Vec::new();
    let mut visited = HashSet::new();
    walk(schema, arena, "$", &mut visited, &mut gaps);
    gaps
}

fn walk<'a>(
    schema: &'a SchemaDescription,
    arena: &'a SchemaArena,
    path: &str,
    visited: &mut HashSet<&'a str>,
    gaps: &mut Vec<SchemaError>,
) {
    match schema {
        SchemaDescription::Reference(name) => {
            if !visited.insert(name.as_str()) {
                return;
            }
            if let Some(named) = arena.get(name) {
                walk(named.schema(), arena, path, visited, gaps);
            }
        }
        SchemaDescription::Object(object) => {
            for (name, field) in object.iter() {
                walk(&field.schema, arena, &format!("{path}.{name}"), visited, gaps);
            }
        }
        SchemaDescription::Array(items) => walk(items, arena, &format!("{path}[]"), visited, gaps),
        SchemaDescription::Map(values) => walk(values, arena, &format!("{path}.*"), visited, gaps),
        SchemaDescription::Unsupported { type_name, reason } => gaps.push(SchemaError::Unsupported {
            path: path.to_string(),
            type_name: type_name.clone(),
            reason: reason.clone(),
        }),
        SchemaDescription::Primitive { .. }
        | SchemaDescription::Enumeration(_)
        | SchemaDescription::Any
        | SchemaDescription::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Describe, Field, Inspector, ObjectSchema};
    use std::collections::HashMap;

    struct Inventory;

    impl Describe for Inventory {
        fn describe(inspector: &mut Inspector) -> SchemaDescription {
            inspector.named::<Self, _>(|inspector| {
                SchemaDescription::Object(
                    ObjectSchema::new()
                        .with_field("owner", inspector.field::<String>())
                        .with_field("bins", inspector.field::<HashMap<(u8, u8), u32>>())
                        .with_field("next", inspector.field::<Option<Box<Inventory>>>()),
                )
            })
        }
    }

    #[test]
    fn test_clean_schema_has_no_gaps() {
        let mut inspector = Inspector::default();
        let schema = inspector.describe::<Vec<HashMap<String, f64>>>();
        assert!(check_coverage(&schema, inspector.arena()).is_empty());
    }

    #[test]
    fn test_gap_inside_named_type_found_once() {
        let mut inspector = Inspector::default();
        let schema = inspector.describe::<Vec<Inventory>>();
        let gaps = check_coverage(&schema, inspector.arena());

        assert_eq!(gaps.len(), 1);
        match &gaps[0] {
            SchemaError::Unsupported { path, .. } => assert_eq!(path, "$[].bins"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_inline_object() {
        let arena = SchemaArena::default();
        let schema = SchemaDescription::Object(ObjectSchema::new().with_field(
            "pair",
            Field::new(SchemaDescription::unsupported("(u8, u8)", "tuple")),
        ));
        assert_eq!(check_coverage(&schema, &arena).len(), 1);
    }
}
