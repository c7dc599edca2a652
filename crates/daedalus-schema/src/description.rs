//! The structural schema model.

use indexmap::IndexMap;

/// Scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Text
    String,
    /// Whole number
    Integer,
    /// Any JSON number
    Number,
    /// `true` / `false`
    Boolean,
}

impl PrimitiveKind {
    /// Lowercase name as used in OpenAPI `type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Inclusive bounds of a fixed-width integer type.
///
/// ```rust
/// use daedalus_schema::IntegerRange;
///
/// let range = IntegerRange::new(0, i128::from(u8::MAX));
/// assert!(range.contains(255));
/// assert!(!range.contains(-1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerRange {
    /// Smallest accepted value
    pub min: i128,
    /// Largest accepted value
    pub max: i128,
}

impl IntegerRange {
    /// `min..=max`.
    pub const fn new(min: i128, max: i128) -> Self {
        Self { min, max }
    }

    /// Whether `value` fits.
    pub const fn contains(self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Structural description of a type's shape.
///
/// Named types appear as [`SchemaDescription::Reference`] and are resolved
/// through the [`SchemaArena`](crate::SchemaArena).
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDescription {
    /// A scalar, optionally with an OpenAPI format such as `int64`.
    Primitive {
        /// Scalar kind
        kind: PrimitiveKind,
        /// OpenAPI format hint
        format: Option<&'static str>,
        /// Bounds of the Rust integer type; `None` for other kinds and for
        /// 128-bit integers.
        range: Option<IntegerRange>,
    },
    /// An object with ordered fields.
    Object(ObjectSchema),
    /// A homogeneous sequence.
    Array(Box<SchemaDescription>),
    /// A string-keyed map.
    Map(Box<SchemaDescription>),
    /// A closed set of string values.
    Enumeration(Vec<String>),
    /// A named arena entry.
    Reference(String),
    /// Any JSON value.
    Any,
    /// No body at all.
    Empty,
    /// A type that neither binding nor rendering can represent.
    Unsupported {
        /// Rust type name
        type_name: String,
        /// Why it is unsupported
        reason: String,
    },
}

impl SchemaDescription {
    /// A string schema.
    pub fn string() -> Self {
        Self::Primitive {
            kind: PrimitiveKind::String,
            format: None,
            range: None,
        }
    }

    /// An integer schema with an optional format and no bounds.
    pub fn integer(format: Option<&'static str>) -> Self {
        Self::Primitive {
            kind: PrimitiveKind::Integer,
            format,
            range: None,
        }
    }

    /// An integer schema limited to `range`.
    pub fn bounded_integer(format: Option<&'static str>, range: IntegerRange) -> Self {
        Self::Primitive {
            kind: PrimitiveKind::Integer,
            format,
            range: Some(range),
        }
    }

    /// A number schema with an optional format.
    pub fn number(format: Option<&'static str>) -> Self {
        Self::Primitive {
            kind: PrimitiveKind::Number,
            format,
            range: None,
        }
    }

    /// A boolean schema.
    pub fn boolean() -> Self {
        Self::Primitive {
            kind: PrimitiveKind::Boolean,
            format: None,
            range: None,
        }
    }

    /// An array of `items`.
    pub fn array(items: SchemaDescription) -> Self {
        Self::Array(Box::new(items))
    }

    /// A map with `values`.
    pub fn map(values: SchemaDescription) -> Self {
        Self::Map(Box::new(values))
    }

    /// A reference to a named schema.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// An unsupported marker.
    pub fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the object body if this is an object.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the referenced name if this is a reference.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true for [`SchemaDescription::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// One object field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Shape of the value
    pub schema: SchemaDescription,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Human-readable description, from doc comments
    pub description: Option<String>,
}

impl Field {
    /// A required field.
    pub fn new(schema: SchemaDescription) -> Self {
        Self {
            schema,
            required: true,
            description: None,
        }
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered field map of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: IndexMap<String, Field>,
}

impl ObjectSchema {
    /// An object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, keeping declaration order.
    pub fn insert(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.insert(name, field);
        self
    }

    /// Looks up a field.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Names of the required fields, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, field)| field.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_names_in_order() {
        let object = ObjectSchema::new()
            .with_field("name", Field::new(SchemaDescription::string()))
            .with_field("price", Field::new(SchemaDescription::number(Some("double"))).optional())
            .with_field("stock", Field::new(SchemaDescription::integer(None)));

        assert_eq!(object.required_names(), vec!["name", "stock"]);
        assert_eq!(object.len(), 3);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut object = ObjectSchema::new()
            .with_field("a", Field::new(SchemaDescription::string()))
            .with_field("b", Field::new(SchemaDescription::string()));
        object.insert("a", Field::new(SchemaDescription::boolean()));

        let names: Vec<_> = object.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(object.get("a").unwrap().schema, SchemaDescription::boolean());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(SchemaDescription::reference("Fruit").as_reference(), Some("Fruit"));
        assert!(SchemaDescription::Empty.is_empty());
        assert!(SchemaDescription::Any.as_object().is_none());
        assert_eq!(PrimitiveKind::Number.as_str(), "number");
    }
}
