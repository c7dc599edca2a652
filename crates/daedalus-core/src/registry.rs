//! The route registry.
//!
//! Routes are registered into groups at startup. Registration describes the
//! route's types once, checks the route against everything registered so far
//! and collects problems instead of panicking. [`Registry::build`] freezes
//! the result into a servable [`Api`].
//!
//! # Example
//!
//! ```
//! use daedalus_core::{Annotation, HandlerError, Registry, RequestContext, Route};
//!
//! async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<String>, HandlerError> {
//!     Ok(vec!["apple".to_string()])
//! }
//!
//! let mut registry = Registry::default();
//! registry
//!     .group("/market", "market", "Your daily dose of freshness")
//!     .register(Route::get("", list).annotate(Annotation::summary("List fruits")));
//!
//! assert!(registry.errors().is_empty());
//! let api = registry.build().unwrap();
//! assert_eq!(api.routes().next().unwrap().path, "/market");
//! ```

use std::sync::Arc;

use bytes::Bytes;
use daedalus_extract::{
    BindConfig, Binder, BodyFormat, DefaultBinder, DefaultRenderer, ErrorBody, ErrorResponse,
    ExtractionContext, IntoResponse, RenderContext, Renderer,
};
use daedalus_router::{normalize_path, path_parameters, InsertError, Router};
use daedalus_schema::{
    check_coverage, Describe, Inspector, InspectorConfig, SchemaArena, SchemaDescription,
};
use http::{Method, Response, StatusCode};
use indexmap::IndexMap;
use mime::Mime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::annotation::{Annotation, ParamDoc, ResponseDoc};
use crate::api::{Api, Endpoint};
use crate::context::RequestContext;
use crate::error::{RegistrationError, RegistrationErrors};
use crate::handler::{BoxFuture, ErasedHandler};
use crate::info::{
    derive_operation_id, merge_responses, HeaderInfo, ParamInfo, ResponseInfo, RouteId, RouteInfo,
    TagInfo,
};
use crate::route::Route;

/// Registry settings.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Schema naming overrides.
    pub inspector: InspectorConfig,
    /// Default binder settings for every route.
    pub binding: BindConfig,
    /// Indent JSON written by the default renderer.
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy)]
enum Child {
    Route(RouteId),
    Group(usize),
}

#[derive(Debug)]
struct GroupNode {
    prefix: String,
    tag: Option<String>,
    description: String,
    parent: Option<usize>,
    children: Vec<Child>,
}

/// Collects routes at startup.
///
/// Holds the [`Inspector`] whose arena every route's schemas land in, the
/// path router used for conflict detection, and the group tree that fixes
/// the order routes are documented in.
pub struct Registry {
    config: RegistryConfig,
    inspector: Inspector,
    router: Router<RouteId>,
    groups: Vec<GroupNode>,
    routes: Vec<RouteInfo>,
    endpoints: Vec<Endpoint>,
    errors: Vec<RegistrationError>,
    error_schema: SchemaDescription,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("routes", &self.routes.len())
            .field("groups", &self.groups.len())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        let mut inspector = Inspector::new(config.inspector.clone());
        let error_schema = inspector.describe::<ErrorBody>();
        Self {
            config,
            inspector,
            router: Router::new(),
            groups: vec![GroupNode {
                prefix: String::new(),
                tag: None,
                description: String::new(),
                parent: None,
                children: Vec::new(),
            }],
            routes: Vec::new(),
            endpoints: Vec::new(),
            errors: Vec::new(),
            error_schema,
        }
    }

    /// The root group: no prefix, no tag.
    pub fn root(&mut self) -> RouteGroup<'_> {
        RouteGroup {
            registry: self,
            id: 0,
        }
    }

    /// Opens a top-level group. `name` is its path prefix, `tag` the
    /// documentation tag its routes carry (empty for none).
    pub fn group(
        &mut self,
        name: impl Into<String>,
        tag: impl Into<String>,
        description: impl Into<String>,
    ) -> RouteGroup<'_> {
        let id = self.open_group(0, name.into(), tag.into(), description.into());
        RouteGroup { registry: self, id }
    }

    /// Every problem found so far, in the order found.
    pub fn errors(&self) -> &[RegistrationError] {
        &self.errors
    }

    /// Number of accepted routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no route was accepted.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Named schemas described so far.
    pub fn schemas(&self) -> &SchemaArena {
        self.inspector.arena()
    }

    /// Freezes the registry.
    ///
    /// Refuses while any registration error exists, so a half-registered
    /// API is never served.
    pub fn build(self) -> Result<Api, RegistrationErrors> {
        if !self.errors.is_empty() {
            for err in &self.errors {
                tracing::warn!(error = %err, "registration error");
            }
            return Err(RegistrationErrors::new(self.errors));
        }

        let mut order = Vec::with_capacity(self.routes.len());
        let mut tags: Vec<TagInfo> = Vec::new();
        self.walk(0, &mut order, &mut tags);

        tracing::debug!(routes = order.len(), schemas = self.inspector.arena().len(), "registry frozen");

        Ok(Api::new(
            self.routes,
            order,
            self.endpoints,
            self.router,
            self.inspector.into_arena(),
            tags,
            self.error_schema,
        ))
    }

    fn walk(&self, group: usize, order: &mut Vec<RouteId>, tags: &mut Vec<TagInfo>) {
        let node = &self.groups[group];
        if let Some(tag) = &node.tag {
            if !tags.iter().any(|t| &t.name == tag) {
                tags.push(TagInfo {
                    name: tag.clone(),
                    description: node.description.clone(),
                });
            }
        }
        for child in &node.children {
            match *child {
                Child::Route(id) => order.push(id),
                Child::Group(child) => self.walk(child, order, tags),
            }
        }
    }

    fn open_group(&mut self, parent: usize, prefix: String, tag: String, description: String) -> usize {
        let id = self.groups.len();
        self.groups.push(GroupNode {
            prefix,
            tag: (!tag.is_empty()).then_some(tag),
            description,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.groups[parent].children.push(Child::Group(id));
        id
    }

    /// Path prefixes and tags of `group` and its ancestors, outermost first.
    fn lineage(&self, group: usize) -> (String, Vec<String>) {
        let mut chain = Vec::new();
        let mut current = Some(group);
        while let Some(id) = current {
            chain.push(id);
            current = self.groups[id].parent;
        }
        chain.reverse();

        let mut prefix = String::new();
        let mut tags = Vec::new();
        for id in chain {
            let node = &self.groups[id];
            prefix.push('/');
            prefix.push_str(&node.prefix);
            if let Some(tag) = &node.tag {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        (prefix, tags)
    }

    fn reject(&mut self, error: RegistrationError) {
        tracing::warn!(error = %error, "route rejected");
        self.errors.push(error);
    }

    fn register<In, Out>(&mut self, group: usize, route: Route<In, Out>) -> Option<RouteId>
    where
        In: Describe + DeserializeOwned + Send + 'static,
        Out: Describe + Serialize + Send + 'static,
    {
        let (prefix, group_tags) = self.lineage(group);
        let path = normalize_path(&format!("{prefix}/{}", route.path));
        let method = route.method.clone();

        if let Err(InsertError::InvalidPath { path, reason, .. }) =
            Router::new().insert(&method, &path, ())
        {
            self.reject(RegistrationError::InvalidPath { path, reason });
            return None;
        }

        let mut accepted = true;
        let request_media = self.parse_media(&method, &path, route.request_media.as_deref(), &mut accepted);
        let response_media = self.parse_media(&method, &path, route.response_media.as_deref(), &mut accepted);

        let input = self.inspector.describe::<In>();
        let output = self.inspector.describe::<Out>();
        let docs = self.fold_annotations(&route.annotations);

        // Collisions keep the route; `build` refuses instead.
        for source in self.inspector.take_errors() {
            self.reject(RegistrationError::TypeNameCollision {
                method: method.clone(),
                path: path.clone(),
                source,
            });
        }

        let checks = [
            ("input", &input, route.binder.is_none()),
            ("output", &output, route.renderer.is_none()),
        ];
        for (side, schema, checked) in checks {
            if !checked {
                continue;
            }
            for source in check_coverage(schema, self.inspector.arena()) {
                accepted = false;
                self.reject(RegistrationError::UnsupportedType {
                    method: method.clone(),
                    path: path.clone(),
                    side,
                    source,
                });
            }
        }

        let codecs = [
            ("input", request_media.as_ref(), route.binder.is_none()),
            ("output", response_media.as_ref(), route.renderer.is_none()),
        ];
        for (side, media, checked) in codecs {
            let Some(media) = media.filter(|_| checked) else {
                continue;
            };
            let schema = if side == "input" { &input } else { &output };
            if let Some(reason) = codec_gap(side, media, schema, self.inspector.arena()) {
                accepted = false;
                self.reject(RegistrationError::UnsupportedMediaType {
                    method: method.clone(),
                    path: path.clone(),
                    side,
                    media_type: media.to_string(),
                    reason,
                });
            }
        }

        let mut path_params = Vec::new();
        for name in path_parameters(&path) {
            match self.path_param_info(&name, &input, docs.input_model.as_ref(), &docs.path_params) {
                Some(param) => path_params.push(param),
                None => {
                    accepted = false;
                    self.reject(RegistrationError::UnresolvedPathParameter {
                        method: method.clone(),
                        path: path.clone(),
                        parameter: name,
                    });
                }
            }
        }

        if !accepted {
            return None;
        }

        let id = RouteId(self.routes.len());
        match self.router.insert(&method, &path, id) {
            Ok(()) => {}
            Err(InsertError::Conflict { method, path, .. }) => {
                self.reject(RegistrationError::DuplicateRoute { method, path });
                return None;
            }
            Err(err) => {
                let reason = err.to_string();
                self.reject(RegistrationError::InvalidPath { path, reason });
                return None;
            }
        }

        let mut tags = group_tags;
        for tag in docs.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let success = ResponseInfo::new(
            route.status.canonical_reason().unwrap_or("Success"),
            (!output.is_empty()).then(|| output.clone()),
        );
        let mut responses = IndexMap::new();
        responses.insert(route.status, success);
        merge_responses(&mut responses, docs.responses);

        let info = RouteInfo {
            id,
            operation_id: docs
                .operation_id
                .unwrap_or_else(|| derive_operation_id(&method, &path)),
            method,
            path,
            summary: docs.summary,
            description: docs.description,
            tags,
            deprecated: docs.deprecated,
            status: route.status,
            input: input.clone(),
            input_model: docs.input_model,
            output: output.clone(),
            path_params,
            header_params: docs.headers,
            query_params: docs.query_params,
            responses,
            request_media: request_media.clone(),
            response_media: response_media.clone(),
            bind_hooked: route.binder.is_some(),
            bind_error_status: if route.binder.is_some() {
                StatusCode::BAD_REQUEST
            } else {
                self.config.binding.error_status
            },
            render_hooked: route.renderer.is_some(),
        };

        let binder: Arc<dyn Binder<In>> = match route.binder {
            Some(binder) => binder,
            None => {
                let binder = DefaultBinder::<In>::new(input, self.config.binding.clone());
                Arc::new(match request_media {
                    Some(media) => binder.with_media_type(media),
                    None => binder,
                })
            }
        };
        let renderer: Arc<dyn Renderer<Out>> = match route.renderer {
            Some(renderer) => renderer,
            None => Arc::new(DefaultRenderer::<Out>::new(response_media).empty_body(output.is_empty())),
        };

        tracing::debug!(
            method = %info.method,
            path = %info.path,
            operation_id = %info.operation_id,
            "route registered"
        );

        self.endpoints.push(endpoint(
            binder,
            route.handler,
            renderer,
            route.status,
            self.config.pretty_json,
        ));
        self.routes.push(info);
        self.groups[group].children.push(Child::Route(id));
        Some(id)
    }

    fn parse_media(
        &mut self,
        method: &Method,
        path: &str,
        media: Option<&str>,
        accepted: &mut bool,
    ) -> Option<Mime> {
        let media = media?;
        match media.parse::<Mime>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                *accepted = false;
                self.reject(RegistrationError::InvalidMediaType {
                    method: method.clone(),
                    path: path.to_string(),
                    media_type: media.to_string(),
                });
                None
            }
        }
    }

    fn fold_annotations(&mut self, annotations: &[Annotation]) -> FoldedDocs {
        let mut docs = FoldedDocs::default();
        for annotation in annotations {
            match annotation {
                Annotation::Summary(text) => docs.summary = Some(text.clone()),
                Annotation::Description(text) => docs.description = Some(text.clone()),
                Annotation::OperationId(id) => docs.operation_id = Some(id.clone()),
                Annotation::Tag(tag) => docs.tags.push(tag.clone()),
                Annotation::Deprecated => docs.deprecated = true,
                Annotation::Response(response) => {
                    let info = self.response_info(response);
                    docs.responses.push((response.status, info));
                }
                Annotation::Header(param) => {
                    let info = self.param_info(param);
                    docs.headers.push(info);
                }
                Annotation::QueryParam(param) => {
                    let info = self.param_info(param);
                    docs.query_params.push(info);
                }
                Annotation::PathParam(param) => {
                    let info = self.param_info(param);
                    docs.path_params.push(info);
                }
                Annotation::InputModel(model) => {
                    docs.input_model = Some(model.describe(&mut self.inspector));
                }
            }
        }
        docs
    }

    fn param_info(&mut self, param: &ParamDoc) -> ParamInfo {
        ParamInfo {
            name: param.name.clone(),
            description: (!param.description.is_empty()).then(|| param.description.clone()),
            schema: param.model.describe(&mut self.inspector),
            required: param.required,
        }
    }

    fn response_info(&mut self, response: &ResponseDoc) -> ResponseInfo {
        let schema = response.model.map(|model| model.describe(&mut self.inspector));
        let mut info = ResponseInfo::new(response.description.clone(), schema);
        for (name, header) in &response.headers {
            info.headers.insert(
                name.clone(),
                HeaderInfo {
                    description: header.description.clone(),
                    schema: header.model.describe(&mut self.inspector),
                },
            );
        }
        info.examples = response.examples.clone();
        info
    }

    /// Documents path parameter `name`: from the input's field, the input
    /// model's field, or a `PathParam` annotation, in that order.
    fn path_param_info(
        &self,
        name: &str,
        input: &SchemaDescription,
        input_model: Option<&SchemaDescription>,
        annotated: &[ParamInfo],
    ) -> Option<ParamInfo> {
        let arena = self.inspector.arena();
        let annotation = annotated.iter().rev().find(|p| p.name == name);
        let field = std::iter::once(input)
            .chain(input_model)
            .find_map(|schema| arena.resolve(schema).as_object()?.get(name));

        match (field, annotation) {
            (Some(field), annotation) => Some(ParamInfo {
                name: name.to_string(),
                description: annotation
                    .and_then(|a| a.description.clone())
                    .or_else(|| field.description.clone()),
                schema: field.schema.clone(),
                required: true,
            }),
            (None, Some(annotation)) => Some(ParamInfo {
                required: true,
                ..annotation.clone()
            }),
            (None, None) => None,
        }
    }
}

/// Why the default codec for `side` cannot carry `schema` as `media`, if
/// it cannot. Empty types never touch a body.
fn codec_gap(
    side: &str,
    media: &Mime,
    schema: &SchemaDescription,
    arena: &SchemaArena,
) -> Option<&'static str> {
    if schema.is_empty() {
        return None;
    }
    let Some(format) = BodyFormat::from_mime(media) else {
        return Some("no default codec for this media type; install a hook");
    };
    let supported = if side == "input" {
        format.can_decode(schema, arena)
    } else {
        format.can_encode(schema, arena)
    };
    (!supported).then_some(match format {
        BodyFormat::Text => "plain text binds to string inputs only",
        _ => "form bodies carry flat objects only",
    })
}

#[derive(Debug, Default)]
struct FoldedDocs {
    summary: Option<String>,
    description: Option<String>,
    operation_id: Option<String>,
    tags: Vec<String>,
    deprecated: bool,
    responses: Vec<(StatusCode, ResponseInfo)>,
    headers: Vec<ParamInfo>,
    query_params: Vec<ParamInfo>,
    path_params: Vec<ParamInfo>,
    input_model: Option<SchemaDescription>,
}

/// Builds the type-erased request pipeline of one route:
/// bind, then handle, then render.
fn endpoint<In, Out>(
    binder: Arc<dyn Binder<In>>,
    handler: ErasedHandler<In, Out>,
    renderer: Arc<dyn Renderer<Out>>,
    status: StatusCode,
    pretty: bool,
) -> Endpoint
where
    In: Send + 'static,
    Out: Send + 'static,
{
    Arc::new(
        move |ctx: RequestContext,
              request: ExtractionContext,
              schemas: &SchemaArena|
              -> BoxFuture<'static, Response<Bytes>> {
            let input = match binder.bind(&request, schemas) {
                Ok(input) => input,
                Err(err) => {
                    tracing::debug!(
                        kind = %err.kind(),
                        status = err.status().as_u16(),
                        error = %err.message(),
                        "request rejected by binder"
                    );
                    return Box::pin(std::future::ready(err.into_response()));
                }
            };

            let handler = Arc::clone(&handler);
            let renderer = Arc::clone(&renderer);
            Box::pin(async move {
                match handler(ctx, input).await {
                    Ok(output) => {
                        let cx = RenderContext::new(request.headers(), pretty);
                        match renderer.render(status, output, &cx) {
                            Ok(response) => response,
                            Err(err) => {
                                tracing::error!(error = %err, "failed to render response");
                                ErrorResponse::new(
                                    StatusCode::INTERNAL_SERVER_ERROR,
                                    "render-error",
                                    "failed to render response",
                                )
                                .into_response()
                            }
                        }
                    }
                    Err(err) => {
                        if err.status_code().is_server_error() {
                            tracing::error!(
                                error = %err,
                                cause = ?std::error::Error::source(&err),
                                "handler failed"
                            );
                        } else {
                            tracing::debug!(error = %err, "handler declined request");
                        }
                        err.into_response()
                    }
                }
            })
        },
    )
}

/// A group of routes sharing a path prefix and a documentation tag.
///
/// Borrowed from the [`Registry`]; registration happens through it.
#[derive(Debug)]
pub struct RouteGroup<'r> {
    registry: &'r mut Registry,
    id: usize,
}

impl RouteGroup<'_> {
    /// Registers a route under this group's prefix.
    ///
    /// Returns `None` when the route was rejected; the reason is recorded in
    /// [`Registry::errors`].
    pub fn register<In, Out>(&mut self, route: Route<In, Out>) -> Option<RouteId>
    where
        In: Describe + DeserializeOwned + Send + 'static,
        Out: Describe + Serialize + Send + 'static,
    {
        self.registry.register(self.id, route)
    }

    /// Opens a nested group.
    pub fn sub_group(
        &mut self,
        name: impl Into<String>,
        tag: impl Into<String>,
        description: impl Into<String>,
    ) -> RouteGroup<'_> {
        let id = self
            .registry
            .open_group(self.id, name.into(), tag.into(), description.into());
        RouteGroup {
            registry: self.registry,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerError;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, Describe)]
    struct Fruit {
        name: String,
        price: f64,
    }

    async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<Fruit>, HandlerError> {
        Ok(Vec::new())
    }

    async fn add(_ctx: RequestContext, fruit: Fruit) -> Result<Fruit, HandlerError> {
        Ok(fruit)
    }

    #[test]
    fn test_group_prefix_and_tags() {
        let mut registry = Registry::default();
        let mut api = registry.group("/api", "", "");
        let mut market = api.sub_group("market", "market", "Your daily dose of freshness");
        let id = market.register(Route::get("/", list)).unwrap();

        let info = &registry.routes[id.index()];
        assert_eq!(info.path, "/api/market");
        assert_eq!(info.tags, vec!["market"]);
        assert_eq!(info.operation_id, "get_api_market");
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut registry = Registry::default();
        let mut market = registry.group("market", "market", "");
        assert!(market.register(Route::post("", add)).is_some());
        assert!(market.register(Route::post("/", add)).is_none());

        assert_eq!(
            registry.errors(),
            &[RegistrationError::DuplicateRoute {
                method: Method::POST,
                path: "/market".to_string(),
            }]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_param_name_clash_is_invalid_path() {
        let mut registry = Registry::default();
        let mut root = registry.root();
        root.register(
            Route::get("/fruits/{id}", list).annotate(Annotation::path_param::<u64>("id", "")),
        );
        root.register(
            Route::delete("/fruits/{name}", list)
                .annotate(Annotation::path_param::<String>("name", "")),
        );
        assert!(matches!(
            registry.errors(),
            [RegistrationError::InvalidPath { .. }]
        ));
    }

    #[test]
    fn test_unresolved_path_param() {
        let mut registry = Registry::default();
        let id = registry.root().register(Route::get("/fruits/{id}", list));
        assert!(id.is_none());
        assert_eq!(
            registry.errors(),
            &[RegistrationError::UnresolvedPathParameter {
                method: Method::GET,
                path: "/fruits/{id}".to_string(),
                parameter: "id".to_string(),
            }]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_path_param_from_input_field() {
        let mut registry = Registry::default();
        let id = registry
            .root()
            .register(Route::put("/fruits/{name}", add))
            .unwrap();
        let param = &registry.routes[id.index()].path_params[0];
        assert_eq!(param.name, "name");
        assert_eq!(param.schema, SchemaDescription::string());
    }

    #[test]
    fn test_path_param_from_input_model() {
        #[derive(Deserialize, Describe)]
        #[allow(dead_code)]
        struct Override {
            name: String,
            price: f64,
        }

        let mut registry = Registry::default();
        let route = Route::post(
            "/fruits/{name}/override",
            |_ctx: RequestContext, _input: serde_json::Value| async move {
                Ok::<_, HandlerError>(())
            },
        )
        .annotate(Annotation::input_model::<Override>());
        assert!(registry.root().register(route).is_some());
    }

    #[test]
    fn test_invalid_media_type() {
        let mut registry = Registry::default();
        let id = registry
            .root()
            .register(Route::post("/fruits", add).request_media_type("not a media type"));
        assert!(id.is_none());
        assert!(matches!(
            registry.errors(),
            [RegistrationError::InvalidMediaType { .. }]
        ));
    }

    #[test]
    fn test_media_override_without_codec() {
        let mut registry = Registry::default();
        let mut root = registry.root();
        assert!(root
            .register(Route::get("/page", list).response_media_type("text/html"))
            .is_none());
        assert!(root
            .register(Route::post("/upload", add).request_media_type("multipart/form-data"))
            .is_none());

        assert!(matches!(
            registry.errors(),
            [
                RegistrationError::UnsupportedMediaType { side: "output", media_type, .. },
                RegistrationError::UnsupportedMediaType { side: "input", .. },
            ] if media_type == "text/html"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_form_override_needs_flat_shape() {
        #[derive(Debug, Deserialize, Serialize, Describe)]
        struct Crate {
            label: String,
            fruit: Fruit,
        }

        let echo = |_ctx: RequestContext, input: Crate| async move { Ok::<_, HandlerError>(input) };
        let form = "application/x-www-form-urlencoded";

        let mut registry = Registry::default();
        let mut root = registry.root();
        assert!(root.register(Route::post("/fruits", add).request_media_type(form)).is_some());
        assert!(root.register(Route::post("/crates", echo).request_media_type(form)).is_none());
        assert!(root.register(Route::get("/fruits", list).response_media_type(form)).is_none());

        let sides: Vec<&str> = registry
            .errors()
            .iter()
            .filter_map(|e| match e {
                RegistrationError::UnsupportedMediaType { side, .. } => Some(*side),
                _ => None,
            })
            .collect();
        assert_eq!(sides, vec!["input", "output"]);
    }

    #[test]
    fn test_media_override_with_hooks_is_accepted() {
        let mut registry = Registry::default();
        let route = Route::post("/page", |_ctx: RequestContext, (): ()| async move {
            Ok::<_, HandlerError>(())
        })
        .bind_hook(|_req: &ExtractionContext| Ok(()))
        .render_hook(|(): ()| "<h2>page</h2>")
        .request_media_type("multipart/form-data")
        .response_media_type("text/html");

        assert!(registry.root().register(route).is_some());
        assert!(registry
            .root()
            .register(Route::get("/plain", list).response_media_type("text/plain"))
            .is_some());
        assert!(registry.errors().is_empty());
    }

    #[test]
    fn test_unsupported_output_unless_hooked() {
        #[derive(Serialize)]
        struct Pair(u32, u32);

        impl Describe for Pair {
            fn describe(_inspector: &mut Inspector) -> SchemaDescription {
                SchemaDescription::unsupported("Pair", "tuple structs have no field names")
            }
        }

        let pair = |_ctx: RequestContext, _input: ()| async move { Ok::<_, HandlerError>(Pair(1, 2)) };

        let mut registry = Registry::default();
        assert!(registry.root().register(Route::get("/pair", pair)).is_none());
        assert!(matches!(
            registry.errors(),
            [RegistrationError::UnsupportedType { side: "output", .. }]
        ));

        let mut registry = Registry::default();
        let hooked = Route::get("/pair", pair).render_hook(|p: Pair| format!("{},{}", p.0, p.1));
        assert!(registry.root().register(hooked).is_some());
        assert!(registry.errors().is_empty());
    }

    #[test]
    fn test_build_refuses_with_errors() {
        let mut registry = Registry::default();
        registry.root().register(Route::get("/fruits/{id}", list));
        let err = registry.build().unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_interleaved_children_keep_order() {
        let mut registry = Registry::default();
        let mut root = registry.root();
        root.register(Route::get("/a", list));
        root.sub_group("b", "b", "").register(Route::get("", list));
        root.register(Route::get("/c", list));

        let api = registry.build().unwrap();
        let paths: Vec<&str> = api.routes().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(api.tags().len(), 1);
    }
}
