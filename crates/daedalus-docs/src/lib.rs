//! # Daedalus Docs
//!
//! OpenAPI 3.1 documents inferred from registered routes.
//!
//! This crate provides:
//! - [`OpenApiGenerator`] - builds an [`OpenApi`] document from a built
//!   [`Api`](daedalus_core::Api): one operation per route, components from
//!   the schema arena
//! - [`DocumentEndpoint`] - serves the document as JSON, YAML, negotiated by
//!   `Accept`, and as a Swagger UI page
//!
//! ## Quick Start
//!
//! ```rust
//! use daedalus_core::{Annotation, HandlerError, Registry, RequestContext, Route};
//! use daedalus_docs::OpenApiGenerator;
//! use daedalus_schema::Describe;
//! use serde::Serialize;
//!
//! #[derive(Serialize, Describe)]
//! struct Fruit {
//!     name: String,
//!     price: f64,
//! }
//!
//! async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<Fruit>, HandlerError> {
//!     Ok(Vec::new())
//! }
//!
//! let mut registry = Registry::default();
//! registry
//!     .group("market", "market", "Your daily dose of freshness")
//!     .register(Route::get("", list).annotate(Annotation::summary("List fruits")));
//! let api = registry.build().unwrap();
//!
//! let doc = OpenApiGenerator::new().title("Market").version("1.0.0").generate(&api);
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("#/components/schemas/Fruit"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod endpoint;
mod error;
mod generator;
mod openapi;
mod swagger;

pub use endpoint::{DocumentEndpoint, DocumentPaths};
pub use error::{DocsError, DocsResult};
pub use generator::{convert_schema, openapi_path, OpenApiGenerator, COMPONENT_PREFIX};
pub use openapi::{
    Components, Example, Header, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn,
    PathItem, RequestBody, Response, Schema, SchemaType, Server, Tag, OPENAPI_VERSION,
};
pub use swagger::{SwaggerUi, SWAGGER_UI_ASSETS};
