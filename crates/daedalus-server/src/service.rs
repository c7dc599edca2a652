//! What the server calls for each request.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use daedalus_core::Api;
use http::{Request, Response};

/// Answers buffered requests.
///
/// The server collects each request body before calling the service, so
/// implementations see the whole request at once.
pub trait Service: Send + Sync + 'static {
    /// Produces the response to `request`.
    fn call(&self, request: Request<Bytes>) -> impl Future<Output = Response<Bytes>> + Send;
}

impl Service for Api {
    fn call(&self, request: Request<Bytes>) -> impl Future<Output = Response<Bytes>> + Send {
        self.handle(request)
    }
}

impl<S: Service> Service for Arc<S> {
    fn call(&self, request: Request<Bytes>) -> impl Future<Output = Response<Bytes>> + Send {
        S::call(self, request)
    }
}
