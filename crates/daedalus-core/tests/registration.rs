//! Registration properties over generated route sets.

use std::collections::HashSet;

use daedalus_core::{Annotation, HandlerError, RegistrationError, Registry, RequestContext, Route};
use daedalus_schema::Describe;
use http::{Method, StatusCode};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Describe)]
struct Item {
    id: u64,
    label: String,
}

async fn by_id(_ctx: RequestContext, item: Item) -> Result<Item, HandlerError> {
    Ok(item)
}

async fn static_route(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
    Ok("static".to_string())
}

fn method_strategy() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::GET),
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::DELETE),
        Just(Method::PATCH),
    ]
}

/// Route shapes: a static leaf, or a leaf under `{id}`, which every item
/// input resolves.
fn route_strategy() -> impl Strategy<Value = (Method, String, bool)> {
    (method_strategy(), "[a-z]{1,6}", any::<bool>())
}

fn register(registry: &mut Registry, method: &Method, segment: &str, with_param: bool) {
    let mut root = registry.root();
    if with_param {
        root.register(Route::new(method.clone(), format!("/items/{{id}}/{segment}"), by_id));
    } else {
        root.register(Route::new(method.clone(), format!("/static/{segment}"), static_route));
    }
}

proptest! {
    #[test]
    fn prop_distinct_resolvable_routes_have_no_errors(
        routes in proptest::collection::vec(route_strategy(), 1..24)
    ) {
        let mut registry = Registry::default();
        let mut seen = HashSet::new();
        for (method, segment, with_param) in &routes {
            if seen.insert((method.clone(), segment.clone(), *with_param)) {
                register(&mut registry, method, segment, *with_param);
            }
        }
        prop_assert!(registry.errors().is_empty(), "{:?}", registry.errors());
        prop_assert_eq!(registry.len(), seen.len());
    }

    #[test]
    fn prop_duplicates_are_reported_and_dropped(
        (method, segment, with_param) in route_strategy()
    ) {
        let mut registry = Registry::default();
        register(&mut registry, &method, &segment, with_param);
        register(&mut registry, &method, &segment, with_param);

        prop_assert_eq!(registry.len(), 1);
        let is_duplicate = matches!(
            registry.errors(),
            [RegistrationError::DuplicateRoute { .. }]
        );
        prop_assert!(is_duplicate);
    }
}

#[test]
fn test_second_registration_is_not_served() {
    let mut registry = Registry::default();
    let mut root = registry.root();
    let first = root.register(Route::get("/fruit", |_ctx: RequestContext, (): ()| async move {
        Ok::<_, HandlerError>("first".to_string())
    }));
    let second = root.register(Route::get("/fruit/", |_ctx: RequestContext, (): ()| async move {
        Ok::<_, HandlerError>("second".to_string())
    }));
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(registry.len(), 1);

    let errors = registry.build().unwrap_err();
    assert_eq!(
        errors.errors(),
        &[RegistrationError::DuplicateRoute {
            method: Method::GET,
            path: "/fruit".to_string(),
        }]
    );
}

#[test]
fn test_path_param_annotation_resolves() {
    let mut registry = Registry::default();
    let id = registry.root().register(
        Route::delete("/market/{name}", static_route)
            .annotate(Annotation::path_param::<String>("name", "Fruit name")),
    );
    assert!(id.is_some());

    let api = registry.build().unwrap();
    let info = api.routes().next().unwrap();
    assert_eq!(info.path_params[0].description.as_deref(), Some("Fruit name"));
    assert_eq!(info.operation_id, "delete_market_by_name");
}

#[test]
fn test_summary_last_wins_and_tags_inherit() {
    let mut registry = Registry::default();
    let mut shop = registry.group("shop", "shop", "Everything for sale");
    let mut market = shop.sub_group("market", "market", "Fresh produce");
    market.register(
        Route::get("", static_route)
            .summary("first")
            .summary("List fruits")
            .annotate(Annotation::tag("produce"))
            .annotate(Annotation::tag("market")),
    );

    let api = registry.build().unwrap();
    let info = api.routes().next().unwrap();
    assert_eq!(info.summary.as_deref(), Some("List fruits"));
    assert_eq!(info.tags, vec!["shop", "market", "produce"]);
    let tags: Vec<&str> = api.tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["shop", "market"]);
}

#[test]
fn test_annotation_response_never_replaces_success() {
    let mut registry = Registry::default();
    registry.root().register(
        Route::get("/fruits", static_route)
            .annotate(Annotation::response(StatusCode::OK, "Overridden"))
            .annotate(Annotation::response(StatusCode::NOT_FOUND, "Nothing here")),
    );

    let api = registry.build().unwrap();
    let info = api.routes().next().unwrap();
    let ok = &info.responses[&StatusCode::OK];
    assert_eq!(ok.description, "OK");
    assert!(ok.schema.is_some());
    assert_eq!(info.responses[&StatusCode::NOT_FOUND].description, "Nothing here");
}
