//! # Daedalus Extract
//!
//! The request and response edges of a route: binding raw requests into
//! typed inputs and rendering typed outputs into responses.
//!
//! | Piece | Default | Override |
//! |-------|---------|----------|
//! | [`Binder`] | [`DefaultBinder`]: size limit, media type, decode, path params, validation | [`FnBinder`] or any `Binder` impl |
//! | [`Renderer`] | [`DefaultRenderer`]: `Accept` negotiation over JSON, YAML or the route's media type | [`FnRenderer`] or any `Renderer` impl |
//!
//! ## Example
//!
//! ```rust
//! use daedalus_extract::{BindConfig, Binder, DefaultBinder, ExtractionContext};
//! use daedalus_schema::{Describe, Inspector};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Describe)]
//! struct FruitPath {
//!     id: u64,
//! }
//!
//! let mut inspector = Inspector::default();
//! let schema = inspector.describe::<FruitPath>();
//! let binder = DefaultBinder::<FruitPath>::new(schema, BindConfig::default());
//!
//! let req = ExtractionContext::builder().path_param("id", "42").build();
//! let bound = binder.bind(&req, inspector.arena()).unwrap();
//! assert_eq!(bound.id, 42);
//! ```
//!
//! ## Errors
//!
//! Rejections are [`BindError`]s carrying a kind (`decode-error` or
//! `validation-error`), a message, every field violation and a status. They
//! render as the shared [`ErrorBody`](response::ErrorBody):
//!
//! ```json
//! {"kind": "validation-error", "message": "...", "errors": [{"field": "$.id", "message": "..."}]}
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod context;
mod error;
mod media;
mod query;
mod renderer;
pub mod response;

pub use binder::{BindConfig, Binder, DefaultBinder, FnBinder, DEFAULT_MAX_BODY_BYTES};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{BindError, BindErrorKind, RenderError};
pub use media::{
    negotiate, BodyFormat, APPLICATION_YAML, DEFAULT_REQUEST_MEDIA_TYPES,
    DEFAULT_RESPONSE_MEDIA_TYPES,
};
pub use query::parse_query;
pub use renderer::{DefaultRenderer, FnRenderer, RenderContext, Renderer};
pub use response::{ErrorBody, ErrorResponse, IntoResponse};
