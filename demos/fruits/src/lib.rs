//! Fruit market demo service.
//!
//! An in-memory market exposed under `/market`:
//!
//! | Method | Path                      | Handler                         |
//! |--------|---------------------------|---------------------------------|
//! | POST   | `/market`                 | add a fruit                     |
//! | GET    | `/market`                 | list fruits, optionally by origin |
//! | GET    | `/market/{name}`          | fetch one fruit                 |
//! | DELETE | `/market/{name}`          | remove a fruit                  |
//! | POST   | `/market/{name}/override` | hooks and media type overrides  |
//!
//! The document is served at `/openapi.json` and friends.

use std::sync::Arc;

use daedalus::extract::response::HtmlResponse;
use daedalus::prelude::*;
use http::StatusCode;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A fruit on sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Describe)]
pub struct Fruit {
    /// Name, unique in the market
    pub name: String,
    /// Country of origin
    pub origin: String,
    /// Price per kilogram
    pub price: f64,
    /// Internal shelf location, never exposed
    #[serde(skip)]
    pub shelf: u32,
}

/// The name of a fruit, bound from the path.
#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
pub struct FruitName {
    /// Fruit name
    pub name: String,
}

/// Filter for the listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only fruits from this country
    pub origin: Option<String>,
}

/// Documented body of the override route; the bind hook never reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
pub struct OverrideParam {
    /// Fruit name
    pub name: String,
    /// Free text
    pub message: String,
}

/// The market stock, keyed by name in insertion order.
#[derive(Debug, Default)]
pub struct Market {
    fruits: RwLock<IndexMap<String, Fruit>>,
}

impl Market {
    /// A market with a few fruits already on the shelves.
    pub fn seeded() -> Self {
        let market = Self::default();
        for (name, origin, price) in [("banana", "Ecuador", 1.2), ("apple", "France", 2.5)] {
            let fruit = Fruit {
                name: name.to_string(),
                origin: origin.to_string(),
                price,
                shelf: 0,
            };
            market.fruits.write().insert(fruit.name.clone(), fruit);
        }
        market
    }

    /// Adds a fruit; a name can only be on sale once.
    pub fn add(&self, fruit: Fruit) -> Result<Fruit, HandlerError> {
        let mut fruits = self.fruits.write();
        if fruits.contains_key(&fruit.name) {
            return Err(HandlerError::conflict(format!(
                "fruit {} already exists",
                fruit.name
            )));
        }
        fruits.insert(fruit.name.clone(), fruit.clone());
        Ok(fruit)
    }

    /// Fruits in insertion order, filtered by origin.
    pub fn list(&self, origin: Option<&str>) -> Vec<Fruit> {
        self.fruits
            .read()
            .values()
            .filter(|f| origin.map_or(true, |o| f.origin.eq_ignore_ascii_case(o)))
            .cloned()
            .collect()
    }

    /// Looks up a fruit.
    pub fn get(&self, name: &str) -> Result<Fruit, HandlerError> {
        self.fruits
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    /// Removes a fruit.
    pub fn remove(&self, name: &str) -> Result<(), HandlerError> {
        self.fruits
            .write()
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }
}

fn not_found(name: &str) -> HandlerError {
    HandlerError::not_found(format!("fruit {name} not found"))
}

/// Registers the market routes.
pub fn routes(registry: &mut Registry, market: &Arc<Market>) {
    let mut group = registry.group("market", "market", "Your daily dose of freshness");

    let add = Arc::clone(market);
    group.register(
        Route::post("", move |_ctx: RequestContext, fruit: Fruit| {
            let market = Arc::clone(&add);
            async move {
                let fruit = market.add(fruit)?;
                tracing::info!(name = %fruit.name, "fruit added");
                Ok::<_, HandlerError>(fruit)
            }
        })
        .status(StatusCode::CREATED)
        .annotate(Annotation::summary("Add a fruit to the market"))
        .annotate(Annotation::response_with_examples(
            StatusCode::CONFLICT,
            "Fruit already on sale",
            Vec::<(String, HeaderDoc)>::new(),
            [("fruitExists", json!({"kind": "conflict", "message": "fruit apple already exists", "errors": []}))],
        )),
    );

    let list = Arc::clone(market);
    group.register(
        Route::get("", move |ctx: RequestContext, (): ()| {
            let market = Arc::clone(&list);
            async move {
                let query: ListQuery = ctx
                    .query()
                    .map_err(|e| HandlerError::validation(e.to_string()))?;
                Ok::<_, HandlerError>(market.list(query.origin.as_deref()))
            }
        })
        .annotate(Annotation::summary("List the fruits of the market"))
        .annotate(Annotation::query_param::<String>(
            "origin",
            "Only fruits from this country",
            false,
        ))
        .annotate(Annotation::header::<i64>(
            "X-Market-Listing-Size",
            "Listing size",
        )),
    );

    let get = Arc::clone(market);
    group.register(
        Route::get("/{name}", move |_ctx: RequestContext, input: FruitName| {
            let market = Arc::clone(&get);
            async move { market.get(&input.name) }
        })
        .annotate(Annotation::summary("Fetch a fruit")),
    );

    let remove = Arc::clone(market);
    group.register(
        Route::delete("/{name}", move |_ctx: RequestContext, input: FruitName| {
            let market = Arc::clone(&remove);
            async move { market.remove(&input.name) }
        })
        .status(StatusCode::NO_CONTENT)
        .annotate(Annotation::summary("Remove a fruit from the market"))
        .annotate(Annotation::response_with_examples(
            StatusCode::NOT_FOUND,
            "Fruit not on sale",
            Vec::<(String, HeaderDoc)>::new(),
            [("fruitNotFound", json!({"kind": "not-found", "message": "fruit kiwi not found", "errors": []}))],
        )),
    );

    group.register(
        Route::post("/{name}/override", |_ctx: RequestContext, (): ()| async move {
            Ok::<_, HandlerError>(())
        })
        .annotate(Annotation::input_model::<OverrideParam>())
        .annotate(Annotation::summary(
            "Show how to override the hooks and media types of a route",
        ))
        .bind_hook(|_req: &ExtractionContext| Ok(()))
        .render_hook(|(): ()| HtmlResponse::new("<h2>override</h2>"))
        .request_media_type("multipart/form-data")
        .response_media_type("text/html"),
    );
}

/// The market application for `config`.
pub fn app(
    config: &DaedalusConfig,
    market: Arc<Market>,
) -> Result<App, daedalus::core::RegistrationErrors> {
    let mut registry = Registry::new(config.registry_config());
    routes(&mut registry, &market);
    App::new(registry, config)
}
