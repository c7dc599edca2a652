//! Path resolution for generated code.
//!
//! Generated impls must name `daedalus_schema` whether the user depends on
//! it directly or only through the `daedalus` facade (possibly renamed).

use proc_macro2::{Span, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::Ident;

/// Returns the token stream for accessing `daedalus_schema` items.
///
/// `FoundCrate::Itself` still yields an absolute path: the derive is only used
/// from integration tests and doctests of these crates, where `crate` would
/// point at the test binary.
pub fn schema_path() -> TokenStream {
    if let Ok(found) = crate_name("daedalus-schema") {
        match found {
            FoundCrate::Itself => quote!(::daedalus_schema),
            FoundCrate::Name(name) => {
                let ident = Ident::new(&name, Span::call_site());
                quote!(::#ident)
            }
        }
    } else if let Ok(found) = crate_name("daedalus") {
        match found {
            FoundCrate::Itself => quote!(::daedalus::schema),
            FoundCrate::Name(name) => {
                let ident = Ident::new(&name, Span::call_site());
                quote!(::#ident::schema)
            }
        }
    } else {
        quote!(::daedalus_schema)
    }
}
