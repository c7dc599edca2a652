//! # Daedalus Test
//!
//! In-memory HTTP testing for Daedalus applications: requests go straight
//! to a [`Service`](daedalus_server::Service) such as a built `Api` or an
//! `App`, with no listener and no port.
//!
//! - [`TestClient`] - request builders per method, default headers
//! - [`TestResponse`] - status, header and body accessors plus assertions
//! - JSON, YAML and form bodies in both directions

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
