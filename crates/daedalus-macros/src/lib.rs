//! Procedural macros for Daedalus.
//!
//! Provides `#[derive(Describe)]`, which implements
//! `daedalus_schema::Describe` from a type's declaration and its serde
//! attributes, so the schema used for validation and documentation always
//! matches what serde actually reads and writes.
//!
//! Use it through `daedalus_schema::Describe` or the `daedalus` facade rather
//! than depending on this crate directly.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod crate_path;
mod describe;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Describe`.
///
/// Supported shapes:
///
/// - structs with named fields become named object schemas
/// - newtype structs and `#[serde(transparent)]` structs describe their inner type
/// - enums whose variants are all units become named enumerations
///
/// Recognized serde attributes:
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `rename = "..."` on a container | schema name |
/// | `rename_all = "..."` on a container | field or variant naming rule |
/// | `default` on a container | every field optional |
/// | `rename = "..."` on a field/variant | published name (empty keeps the declared name) |
/// | `skip` on a field/variant | omitted entirely |
/// | `default`, `skip_serializing_if`, single-sided skips | field optional |
/// | `flatten` | rejected |
///
/// Doc comments on fields become field descriptions.
///
/// # Example
///
/// ```rust,ignore
/// use daedalus_schema::Describe;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Describe)]
/// #[serde(rename_all = "camelCase")]
/// struct Fruit {
///     /// Common name
///     name: String,
///     unit_price: Option<f64>,
///     #[serde(skip)]
///     supplier_secret: String,
/// }
/// ```
#[proc_macro_derive(Describe, attributes(serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    describe::expand_describe(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
