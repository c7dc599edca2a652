//! # Daedalus
//!
//! **Declarative API-surface builder with inferred OpenAPI 3.1 documents**
//!
//! Daedalus lets a service declare its HTTP surface as typed handlers and
//! derives the rest from the types:
//!
//! - **Schema inference** - `#[derive(Describe)]` types are described once at
//!   registration and cached in an arena
//! - **Route registry** - hierarchical groups with tags, registration errors
//!   collected instead of panicking
//! - **Binding and rendering** - JSON, YAML and form bodies validated against
//!   the inferred schema, `Accept` negotiation on the way out, per-route hooks
//!   for everything else
//! - **OpenAPI 3.1** - served at `/openapi.json`, `/openapi.yaml`, `/openapi`
//!   and a Swagger UI page at `/swagger`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daedalus::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize, Describe)]
//! struct Fruit {
//!     name: String,
//!     price: Option<f64>,
//! }
//!
//! async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<Fruit>, HandlerError> {
//!     Ok(Vec::new())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_optional_file("daedalus.toml")?.load()?;
//!     init_logging(&config.logging.log_config())?;
//!
//!     let mut registry = Registry::new(config.registry_config());
//!     registry
//!         .group("fruits", "fruits", "Your daily dose of freshness")
//!         .register(Route::get("", list).annotate(Annotation::summary("List fruits")));
//!
//!     App::new(registry, &config)?.serve().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → document paths? ──yes──→ DocumentEndpoint
//!              │ no
//!              ↓
//!           Router → Binder → Handler → Renderer → Response (+ x-request-id)
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use app::App;

// Re-export core types
pub use daedalus_core as core;

// Re-export schema inference
pub use daedalus_schema as schema;

// Re-export binding and rendering
pub use daedalus_extract as extract;

// Re-export document generation
pub use daedalus_docs as docs;

// Re-export configuration
pub use daedalus_config as config;

// Re-export logging setup
pub use daedalus_telemetry as telemetry;

// Re-export the HTTP server
pub use daedalus_server as server;

// Re-export path routing
pub use daedalus_router as router;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use daedalus::prelude::*;
///
/// let registry = Registry::default();
/// assert!(registry.errors().is_empty());
/// ```
pub mod prelude {
    pub use crate::App;

    pub use daedalus_core::{
        Annotation, Api, ErrorCategory, HandlerError, HandlerResult, HeaderDoc, ParamDoc,
        Registry, RegistryConfig, RegistrationError, RequestContext, RequestId, ResponseDoc,
        Route, RouteGroup, TypeModel,
    };

    // Schema description and the derive
    pub use daedalus_schema::{Describe, InspectorConfig, SchemaDescription};

    // Binding and rendering strategies
    pub use daedalus_extract::{
        BindConfig, BindError, Binder, ErrorResponse, ExtractionContext, IntoResponse,
        RenderContext, RenderError, Renderer,
    };

    // Document generation
    pub use daedalus_docs::{DocumentEndpoint, DocumentPaths, OpenApi, OpenApiGenerator};

    // Configuration and logging
    pub use daedalus_config::{ConfigLoader, DaedalusConfig};
    pub use daedalus_telemetry::{init_logging, LogConfig, LogOutput};

    // Serving
    pub use daedalus_server::{Server, ServerConfig, ShutdownSignal};
}
