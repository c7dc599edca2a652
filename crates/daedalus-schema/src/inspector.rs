//! The schema inspector and its arena.

use std::any::TypeId;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::describe::Describe;
use crate::description::{Field, SchemaDescription};
use crate::error::SchemaError;

/// Inspector configuration.
///
/// Passed by value into [`Inspector::new`]; two inspectors never share it.
///
/// ```rust
/// use daedalus_schema::InspectorConfig;
///
/// mod legacy {
///     pub struct Fruit;
/// }
///
/// let config = InspectorConfig::new().rename::<legacy::Fruit>("LegacyFruit");
/// assert_eq!(
///     config.name_override(std::any::TypeId::of::<legacy::Fruit>()),
///     Some("LegacyFruit")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct InspectorConfig {
    name_overrides: HashMap<TypeId, String>,
}

impl InspectorConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `T` under `name` instead of its own type name.
    pub fn rename<T: ?Sized + 'static>(mut self, name: impl Into<String>) -> Self {
        self.name_overrides.insert(TypeId::of::<T>(), name.into());
        self
    }

    /// Returns the override registered for a type.
    pub fn name_override(&self, type_id: TypeId) -> Option<&str> {
        self.name_overrides.get(&type_id).map(String::as_str)
    }
}

/// A schema stored under a name in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchema {
    name: String,
    rust_type: &'static str,
    schema: SchemaDescription,
}

impl NamedSchema {
    /// Published name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified Rust type name.
    pub fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    /// The description itself.
    pub fn schema(&self) -> &SchemaDescription {
        &self.schema
    }
}

/// Named schemas keyed by display name, with a type identity index.
///
/// Insertion order is preserved so documents come out in a stable order.
#[derive(Debug, Clone, Default)]
pub struct SchemaArena {
    entries: IndexMap<String, NamedSchema>,
    by_type: HashMap<TypeId, String>,
}

impl SchemaArena {
    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> Option<&NamedSchema> {
        self.entries.get(name)
    }

    /// Returns the name a type was stored under.
    pub fn name_of(&self, type_id: TypeId) -> Option<&str> {
        self.by_type.get(&type_id).map(String::as_str)
    }

    /// Iterates over named schemas in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedSchema> {
        self.entries.values()
    }

    /// Number of named schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follows references until a non-reference description is reached.
    ///
    /// Unknown names resolve to [`SchemaDescription::Any`]; a reference chain
    /// longer than the arena itself means a cycle of bare references and also
    /// resolves to `Any`.
    pub fn resolve<'a>(&'a self, schema: &'a SchemaDescription) -> &'a SchemaDescription {
        const ANY: &SchemaDescription = &SchemaDescription::Any;

        let mut current = schema;
        for _ in 0..=self.entries.len() {
            match current {
                SchemaDescription::Reference(name) => match self.entries.get(name) {
                    Some(named) => current = &named.schema,
                    None => return ANY,
                },
                other => return other,
            }
        }
        ANY
    }
}

/// Builds and memoizes schema descriptions.
///
/// One inspector lives for the duration of route registration. Every type is
/// described at most once; named types are stored in the arena and handed out
/// as references, which also makes recursive types terminate.
#[derive(Debug, Default)]
pub struct Inspector {
    config: InspectorConfig,
    arena: SchemaArena,
    cache: HashMap<TypeId, SchemaDescription>,
    errors: Vec<SchemaError>,
}

impl Inspector {
    /// Creates an inspector with its own configuration.
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Describes `T`, memoized by type identity.
    pub fn describe<T: Describe + ?Sized>(&mut self) -> SchemaDescription {
        let type_id = TypeId::of::<T>();
        if let Some(cached) = self.cache.get(&type_id) {
            return cached.clone();
        }

        let schema = T::describe(self);
        self.cache.insert(type_id, schema.clone());
        schema
    }

    /// Describes `T` as a struct field: optional types produce
    /// `required = false`.
    pub fn field<T: Describe + ?Sized>(&mut self) -> Field {
        let field = Field::new(self.describe::<T>());
        if T::OPTIONAL {
            field.optional()
        } else {
            field
        }
    }

    /// Stores a named type in the arena and returns a reference to it.
    ///
    /// `build` runs at most once per type. The name is reserved before it
    /// runs, so fields that refer back to `T` get a reference instead of
    /// recursing forever.
    pub fn named<T, F>(&mut self, build: F) -> SchemaDescription
    where
        T: Describe + ?Sized,
        F: FnOnce(&mut Self) -> SchemaDescription,
    {
        let type_id = TypeId::of::<T>();
        if let Some(name) = self.arena.by_type.get(&type_id) {
            return SchemaDescription::Reference(name.clone());
        }

        let name = match self.config.name_override(type_id) {
            Some(name) => name.to_string(),
            None => T::type_name().into_owned(),
        };

        if let Some(existing) = self.arena.entries.get(&name) {
            tracing::warn!(
                schema = %name,
                first = existing.rust_type,
                second = std::any::type_name::<T>(),
                "schema name collision"
            );
            self.errors.push(SchemaError::NameCollision {
                name: name.clone(),
                first: existing.rust_type.to_string(),
                second: std::any::type_name::<T>().to_string(),
            });
            return SchemaDescription::Reference(name);
        }

        self.arena.by_type.insert(type_id, name.clone());
        self.arena.entries.insert(
            name.clone(),
            NamedSchema {
                name: name.clone(),
                rust_type: std::any::type_name::<T>(),
                schema: SchemaDescription::Any,
            },
        );

        let schema = build(self);
        if let Some(entry) = self.arena.entries.get_mut(&name) {
            entry.schema = schema;
        }
        tracing::debug!(schema = %name, "described named type");

        SchemaDescription::Reference(name)
    }

    /// The configuration this inspector was built with.
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Named schemas collected so far.
    pub fn arena(&self) -> &SchemaArena {
        &self.arena
    }

    /// Problems recorded so far.
    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    /// Drains the recorded problems.
    pub fn take_errors(&mut self) -> Vec<SchemaError> {
        std::mem::take(&mut self.errors)
    }

    /// Consumes the inspector, keeping only the arena.
    pub fn into_arena(self) -> SchemaArena {
        self.arena
    }
}
