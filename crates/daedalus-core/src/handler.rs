//! Handler trait for request processing.
//!
//! A [`Handler`] receives the [`RequestContext`] and the value produced by
//! the route's binder, and returns the value its renderer turns into a
//! response. Async closures and functions of the shape
//! `Fn(RequestContext, In) -> impl Future<Output = Result<Out, HandlerError>>`
//! are handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{HandlerError, RequestContext};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A trait for handling typed requests.
///
/// # Example
///
/// ```rust
/// use daedalus_core::{Handler, HandlerError, RequestContext};
///
/// struct Echo;
///
/// impl Handler<String, String> for Echo {
///     async fn handle(&self, _ctx: RequestContext, input: String) -> Result<String, HandlerError> {
///         Ok(input)
///     }
/// }
///
/// let out = tokio_test::block_on(Echo.handle(RequestContext::mock(), "fig".to_string()));
/// assert_eq!(out.unwrap(), "fig");
/// ```
pub trait Handler<In, Out>: Send + Sync + 'static {
    /// Handles a bound input.
    fn handle(
        &self,
        ctx: RequestContext,
        input: In,
    ) -> impl Future<Output = Result<Out, HandlerError>> + Send;
}

impl<F, Fut, In, Out> Handler<In, Out> for F
where
    F: Fn(RequestContext, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, HandlerError>> + Send,
{
    fn handle(
        &self,
        ctx: RequestContext,
        input: In,
    ) -> impl Future<Output = Result<Out, HandlerError>> + Send {
        self(ctx, input)
    }
}

/// A handler with its concrete type erased, as stored on a route.
pub(crate) type ErasedHandler<In, Out> =
    Arc<dyn Fn(RequestContext, In) -> BoxFuture<'static, Result<Out, HandlerError>> + Send + Sync>;

/// Erases `handler` behind an `Arc`ed closure producing boxed futures.
pub(crate) fn erase<H, In, Out>(handler: H) -> ErasedHandler<In, Out>
where
    H: Handler<In, Out>,
    In: Send + 'static,
    Out: Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |ctx: RequestContext, input: In| -> BoxFuture<'static, Result<Out, HandlerError>> {
        let handler = Arc::clone(&handler);
        Box::pin(async move { handler.handle(ctx, input).await })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_is_handler() {
        let double = |_ctx: RequestContext, n: u32| async move { Ok::<_, HandlerError>(n * 2) };
        assert_eq!(double.handle(RequestContext::mock(), 21).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_erased_handler_sees_context() {
        let erased = erase(|ctx: RequestContext, (): ()| async move {
            Ok::<_, HandlerError>(ctx.operation_id().unwrap_or_default().to_string())
        });
        let ctx = RequestContext::mock().with_operation_id("get_root");
        assert_eq!(erased(ctx, ()).await.unwrap(), "get_root");
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let erased = erase(|_ctx: RequestContext, name: String| async move {
            Err::<(), _>(HandlerError::not_found(format!("no fruit named {name}")))
        });
        let err = erased(RequestContext::mock(), "kiwi".to_string()).await.unwrap_err();
        assert_eq!(err.message(), "no fruit named kiwi");
    }
}
