//! Schema inspection errors.

use thiserror::Error;

/// Problems found while describing types.
///
/// The inspector never stops at the first problem; it records these and the
/// registry turns them into registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two distinct types resolved to the same schema name.
    #[error("types {first} and {second} both resolve to schema name '{name}'; add a name override for one of them")]
    NameCollision {
        /// Contested schema name
        name: String,
        /// Rust type that claimed the name first
        first: String,
        /// Rust type that was refused
        second: String,
    },

    /// A type cannot be represented.
    #[error("{type_name} at {path} cannot be described: {reason}")]
    Unsupported {
        /// Location inside the described value, `$`-rooted
        path: String,
        /// Rust type name
        type_name: String,
        /// Explanation
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_names_both_types() {
        let err = SchemaError::NameCollision {
            name: "Fruit".to_string(),
            first: "shop::Fruit".to_string(),
            second: "legacy::Fruit".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("shop::Fruit"));
        assert!(msg.contains("legacy::Fruit"));
        assert!(msg.contains("'Fruit'"));
    }

    #[test]
    fn test_unsupported_message() {
        let err = SchemaError::Unsupported {
            path: "$.stock".to_string(),
            type_name: "HashMap<(u8, u8), u32>".to_string(),
            reason: "map keys must serialize as strings".to_string(),
        };
        assert!(err.to_string().starts_with("HashMap<(u8, u8), u32> at $.stock"));
    }
}
