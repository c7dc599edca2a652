//! Type-driven schema inference for Daedalus.
//!
//! Every type that crosses an API boundary implements [`Describe`], usually
//! through `#[derive(Describe)]`. An [`Inspector`] turns those implementations
//! into [`SchemaDescription`] values once, at registration time, and keeps
//! named types in a [`SchemaArena`] keyed by type identity. The arena is then
//! frozen and shared by request binding (through [`Validator`]) and document
//! generation.
//!
//! # Example
//!
//! ```rust
//! use daedalus_schema::{Describe, Inspector, InspectorConfig, SchemaDescription};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Describe)]
//! struct Fruit {
//!     name: String,
//!     price: Option<f64>,
//!     #[serde(skip)]
//!     internal_code: u32,
//! }
//!
//! let mut inspector = Inspector::new(InspectorConfig::default());
//! let reference = inspector.describe::<Fruit>();
//! assert_eq!(reference, SchemaDescription::reference("Fruit"));
//!
//! let fruit = inspector.arena().get("Fruit").unwrap();
//! let object = fruit.schema().as_object().unwrap();
//! assert!(object.get("name").unwrap().required);
//! assert!(!object.get("price").unwrap().required);
//! assert!(object.get("internal_code").is_none());
//! ```
//!
//! # Naming
//!
//! Field names follow serde: `#[serde(rename)]`, container `rename_all`,
//! `#[serde(skip)]` removes a field. Schema names default to the unqualified
//! type name (`Page<Fruit>` becomes `Page_Fruit`). Two distinct types that end
//! up with the same name are reported as [`SchemaError::NameCollision`] unless
//! [`InspectorConfig::rename`] gives one of them another name.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Lets `#[derive(Describe)]` name this crate from inside it.
extern crate self as daedalus_schema;

mod coerce;
mod coverage;
mod describe;
mod description;
mod error;
mod inspector;
mod validate;

pub use coerce::{coerce_scalar, coerce_values};
pub use coverage::check_coverage;
pub use describe::{display_name, Describe};
pub use description::{Field, IntegerRange, ObjectSchema, PrimitiveKind, SchemaDescription};
pub use error::SchemaError;
pub use inspector::{Inspector, InspectorConfig, NamedSchema, SchemaArena};
pub use validate::{value_type_name, FieldViolation, Validator};

/// Derives [`Describe`] for structs with named fields, newtype structs and
/// unit-only enums, honoring serde's naming attributes.
pub use daedalus_macros::Describe;
