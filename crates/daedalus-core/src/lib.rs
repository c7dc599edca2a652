//! # Daedalus Core
//!
//! The route registry and request dispatch of the Daedalus API builder.
//!
//! - [`Registry`], [`RouteGroup`] - hierarchical route registration with
//!   collected [`RegistrationError`]s
//! - [`Route`] - a handler with its annotations and bind/render overrides
//! - [`Annotation`] - documentation the types cannot express
//! - [`Handler`], [`HandlerError`] - the business side of a route
//! - [`Api`] - the frozen registry, answering requests and feeding document
//!   generation through [`RouteInfo`]
//! - [`RequestContext`], [`RequestId`] - per-request metadata
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use daedalus_core::{Annotation, HandlerError, Registry, RequestContext, Route};
//! use daedalus_schema::Describe;
//! use http::{Request, StatusCode};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize, Describe)]
//! struct Fruit {
//!     name: String,
//!     price: f64,
//! }
//!
//! async fn add(_ctx: RequestContext, fruit: Fruit) -> Result<Fruit, HandlerError> {
//!     Ok(fruit)
//! }
//!
//! let mut registry = Registry::default();
//! registry
//!     .group("market", "market", "Your daily dose of freshness")
//!     .register(
//!         Route::post("", add)
//!             .status(StatusCode::CREATED)
//!             .annotate(Annotation::summary("Add a fruit to the market")),
//!     );
//! let api = registry.build().expect("valid registrations");
//!
//! let request = Request::post("/market")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"name": "apple", "price": 1.5}"#))
//!     .unwrap();
//! let response = tokio_test::block_on(api.handle(request));
//! assert_eq!(response.status(), StatusCode::CREATED);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod annotation;
mod api;
mod context;
mod error;
mod handler;
mod info;
mod registry;
mod route;

pub use annotation::{Annotation, HeaderDoc, ParamDoc, ResponseDoc, TypeModel};
pub use api::Api;
pub use context::{RequestContext, RequestId, REQUEST_ID_HEADER};
pub use error::{ErrorCategory, HandlerError, HandlerResult, RegistrationError, RegistrationErrors};
pub use handler::{BoxFuture, Handler};
pub use info::{
    merge_responses, HeaderInfo, ParamInfo, ResponseInfo, RouteId, RouteInfo, TagInfo,
};
pub use registry::{Registry, RegistryConfig, RouteGroup};
pub use route::Route;
