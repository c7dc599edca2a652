//! Route definitions.
//!
//! A [`Route`] is a method, a path template relative to its group, a handler
//! and everything that overrides the defaults around it: annotations, bind
//! and render hooks, media types and the success status.
//!
//! ```
//! use daedalus_core::{Annotation, HandlerError, RequestContext, Route};
//! use http::StatusCode;
//!
//! async fn delete_fruit(_ctx: RequestContext, _input: ()) -> Result<(), HandlerError> {
//!     Ok(())
//! }
//!
//! let route = Route::delete("/{name}", delete_fruit)
//!     .annotate(Annotation::summary("Remove a fruit from the market"))
//!     .annotate(Annotation::path_param::<String>("name", "Fruit name"))
//!     .status(StatusCode::NO_CONTENT);
//! assert_eq!(route.path(), "/{name}");
//! ```

use std::fmt;
use std::sync::Arc;

use daedalus_extract::{
    BindError, Binder, ExtractionContext, FnBinder, FnRenderer, IntoResponse, Renderer,
};
use http::{Method, StatusCode};

use crate::annotation::Annotation;
use crate::handler::{erase, ErasedHandler, Handler};

/// One `(method, path)` pair bound to a handler.
pub struct Route<In, Out> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) handler: ErasedHandler<In, Out>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) binder: Option<Arc<dyn Binder<In>>>,
    pub(crate) renderer: Option<Arc<dyn Renderer<Out>>>,
    pub(crate) request_media: Option<String>,
    pub(crate) response_media: Option<String>,
    pub(crate) status: StatusCode,
}

impl<In, Out> fmt::Debug for Route<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("annotations", &self.annotations)
            .field("bind_hook", &self.binder.is_some())
            .field("render_hook", &self.renderer.is_some())
            .field("request_media", &self.request_media)
            .field("response_media", &self.response_media)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<In, Out> Route<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// A route answering `method` on `path`, relative to its group.
    pub fn new<H>(method: Method, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<In, Out>,
    {
        Self {
            method,
            path: path.into(),
            handler: erase(handler),
            annotations: Vec::new(),
            binder: None,
            renderer: None,
            request_media: None,
            response_media: None,
            status: StatusCode::OK,
        }
    }

    /// `GET path`.
    pub fn get<H: Handler<In, Out>>(path: impl Into<String>, handler: H) -> Self {
        Self::new(Method::GET, path, handler)
    }

    /// `POST path`.
    pub fn post<H: Handler<In, Out>>(path: impl Into<String>, handler: H) -> Self {
        Self::new(Method::POST, path, handler)
    }

    /// `PUT path`.
    pub fn put<H: Handler<In, Out>>(path: impl Into<String>, handler: H) -> Self {
        Self::new(Method::PUT, path, handler)
    }

    /// `PATCH path`.
    pub fn patch<H: Handler<In, Out>>(path: impl Into<String>, handler: H) -> Self {
        Self::new(Method::PATCH, path, handler)
    }

    /// `DELETE path`.
    pub fn delete<H: Handler<In, Out>>(path: impl Into<String>, handler: H) -> Self {
        Self::new(Method::DELETE, path, handler)
    }

    /// Appends an annotation.
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Shorthand for `annotate(Annotation::summary(text))`.
    #[must_use]
    pub fn summary(self, text: impl Into<String>) -> Self {
        self.annotate(Annotation::summary(text))
    }

    /// Replaces binding with a closure over the raw request. The closure is
    /// fully responsible for the value; schema validation is skipped.
    #[must_use]
    pub fn bind_hook<F>(self, hook: F) -> Self
    where
        F: Fn(&ExtractionContext) -> Result<In, BindError> + Send + Sync + 'static,
    {
        self.binder(FnBinder::new(hook))
    }

    /// Replaces binding with a custom [`Binder`].
    #[must_use]
    pub fn binder(mut self, binder: impl Binder<In>) -> Self {
        self.binder = Some(Arc::new(binder));
        self
    }

    /// Replaces rendering with a closure over the handler's output.
    #[must_use]
    pub fn render_hook<F, R>(self, hook: F) -> Self
    where
        F: Fn(Out) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.renderer(FnRenderer::new(hook))
    }

    /// Replaces rendering with a custom [`Renderer`].
    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer<Out>) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// The only request media type the default binder accepts. Checked when
    /// the route is registered.
    #[must_use]
    pub fn request_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.request_media = Some(media_type.into());
        self
    }

    /// The only media type the default renderer produces. Checked when the
    /// route is registered.
    #[must_use]
    pub fn response_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.response_media = Some(media_type.into());
        self
    }

    /// Success status, 200 unless set.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<In, Out> Route<In, Out> {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path template relative to the group.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Annotations in the order they were added.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
