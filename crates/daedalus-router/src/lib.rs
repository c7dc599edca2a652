//! Radix tree router for Daedalus.
//!
//! The router maps `(method, path)` pairs to arbitrary values. Daedalus stores
//! route indices in it, but any `T` works. Unlike a plain map, insertion is
//! fallible: registering the same method on the same path template twice is a
//! conflict that the caller gets back as an [`InsertError`] together with the
//! rejected value, so nothing is ever silently overwritten.
//!
//! # Features
//!
//! - **Path Parameters**: `/fruits/{id}` captures `id`
//! - **Wildcards**: `/static/*path` captures the remaining segments
//! - **Priority**: static segments beat parameters, parameters beat wildcards
//! - **Conflict detection**: duplicate `(method, path)` and clashing parameter names
//!
//! # Example
//!
//! ```rust
//! use daedalus_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(&Method::GET, "/fruits", 0_usize).unwrap();
//! router.insert(&Method::GET, "/fruits/{id}", 1).unwrap();
//!
//! let matched = router.match_route(&Method::GET, "/fruits/42").unwrap();
//! assert_eq!(*matched.value, 1);
//! assert_eq!(matched.params.get("id"), Some("42"));
//!
//! // Registering the same pair again is rejected.
//! assert!(router.insert(&Method::GET, "/fruits", 2).is_err());
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!                  "fruits"
//!                      │
//!              ┌───────┴───────┐
//!            (leaf)          "{id}"
//!          [GET,POST]          │
//!                           (leaf)
//!                      [GET,PUT,DELETE]
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod method_router;
mod node;
mod params;
mod path;
mod router;

pub use error::InsertError;
pub use method_router::MethodRouter;
pub use params::Params;
pub use path::{normalize_path, path_parameters};
pub use router::Router;

/// A matched route with its stored value and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the matched method and path
    pub value: &'a T,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}
