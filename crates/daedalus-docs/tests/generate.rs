//! Document generation over a small fruit market.

use daedalus_core::{
    Annotation, HandlerError, HeaderDoc, Registry, RegistryConfig, RequestContext, Route,
};
use daedalus_extract::{BindConfig, ExtractionContext};
use daedalus_docs::{OpenApi, OpenApiGenerator, ParameterIn, SchemaType};
use daedalus_schema::Describe;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
struct Fruit {
    /// Display name
    name: String,
    price: Option<f64>,
    #[serde(skip)]
    warehouse_code: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
struct PriceUpdate {
    name: String,
    price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
struct Receipt {
    accepted: bool,
    #[serde(skip)]
    audit_trail: Vec<String>,
}

async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<Fruit>, HandlerError> {
    Ok(Vec::new())
}

async fn add(_ctx: RequestContext, fruit: Fruit) -> Result<Fruit, HandlerError> {
    Ok(fruit)
}

async fn update(_ctx: RequestContext, _update: PriceUpdate) -> Result<(), HandlerError> {
    Ok(())
}

async fn remove(_ctx: RequestContext, _input: ()) -> Result<(), HandlerError> {
    Ok(())
}

fn generator() -> OpenApiGenerator {
    OpenApiGenerator::new()
        .title("Fruit Market")
        .version("1.0.0")
        .description("Your daily dose of freshness")
}

fn market() -> daedalus_core::Api {
    let mut registry = Registry::default();
    let mut market = registry.group("market", "market", "Your daily dose of freshness");
    market.register(
        Route::get("", list)
            .annotate(Annotation::summary("List fruits"))
            .annotate(Annotation::query_param::<u32>("limit", "Page size", false))
            .annotate(Annotation::header::<String>("x-market", "Market branch")),
    );
    market.register(
        Route::post("", add)
            .status(StatusCode::CREATED)
            .annotate(Annotation::summary("Add a fruit"))
            .annotate(Annotation::response_with_model::<Receipt>(
                StatusCode::CONFLICT,
                "Fruit already on sale",
            )),
    );
    market.register(
        Route::put("/{name}", update)
            .annotate(Annotation::input_model::<PriceUpdate>())
            .annotate(Annotation::response_with_examples(
                StatusCode::OK,
                "Ignored description",
                [("x-version", HeaderDoc::new::<u64>("Catalogue version"))],
                [("updated", json!(null))],
            )),
    );
    market.register(
        Route::delete("/{name}", remove)
            .annotate(Annotation::path_param::<String>("name", "Fruit to remove"))
            .annotate(Annotation::deprecated()),
    );
    registry.build().unwrap()
}

fn json_of(doc: &OpenApi) -> serde_json::Value {
    serde_json::to_value(doc).unwrap()
}

#[test]
fn test_summary_and_array_response() {
    let doc = generator().generate(&market());
    let operation = doc.operation(&Method::GET, "/market").unwrap();

    assert_eq!(operation.summary.as_deref(), Some("List fruits"));
    assert_eq!(operation.operation_id, "get_market");
    assert_eq!(operation.tags, vec!["market"]);

    let ok = &operation.responses["200"];
    assert_eq!(ok.description, "OK");
    let schema = ok.content["application/json"].schema.as_ref().unwrap();
    assert_eq!(schema.schema_type, Some(SchemaType::Array));
    assert_eq!(
        schema.items.as_ref().unwrap().reference.as_deref(),
        Some("#/components/schemas/Fruit")
    );
    assert!(ok.content.contains_key("application/yaml"));
}

#[test]
fn test_components_list_required_fields_in_order() {
    let doc = generator().generate(&market());
    let value = json_of(&doc);
    let fruit = &value["components"]["schemas"]["Fruit"];

    assert_eq!(fruit["type"], "object");
    assert_eq!(fruit["required"], json!(["name"]));
    assert_eq!(fruit["properties"]["name"]["description"], "Display name");
    assert_eq!(fruit["properties"]["price"]["format"], "double");
}

#[test]
fn test_skipped_fields_never_appear() {
    let doc = generator().generate(&market());
    let json = doc.to_json().unwrap();
    let yaml = doc.to_yaml().unwrap();

    for text in [&json, &yaml] {
        assert!(!text.contains("warehouse_code"));
        assert!(!text.contains("audit_trail"));
    }
    assert!(json.contains("#/components/schemas/Receipt"));
}

#[test]
fn test_parameters_in_order() {
    let doc = generator().generate(&market());
    let list = doc.operation(&Method::GET, "/market").unwrap();
    let locations: Vec<(ParameterIn, &str)> = list
        .parameters
        .iter()
        .map(|p| (p.location, p.name.as_str()))
        .collect();
    assert_eq!(
        locations,
        vec![(ParameterIn::Header, "x-market"), (ParameterIn::Query, "limit")]
    );
    assert!(!list.parameters[0].required);

    let delete = doc.operation(&Method::DELETE, "/market/{name}").unwrap();
    assert!(delete.deprecated);
    let name = &delete.parameters[0];
    assert_eq!(name.location, ParameterIn::Path);
    assert!(name.required);
    assert_eq!(name.description.as_deref(), Some("Fruit to remove"));
}

#[test]
fn test_request_body_media_types() {
    let doc = generator().generate(&market());
    let add = doc.operation(&Method::POST, "/market").unwrap();
    let body = add.request_body.as_ref().unwrap();
    let media: Vec<&str> = body.content.keys().map(String::as_str).collect();
    assert_eq!(
        media,
        vec!["application/json", "application/yaml", "application/x-www-form-urlencoded"]
    );

    let list = doc.operation(&Method::GET, "/market").unwrap();
    assert!(list.request_body.is_none());
}

#[test]
fn test_input_model_documents_body() {
    let doc = generator().generate(&market());
    let update = doc.operation(&Method::PUT, "/market/{name}").unwrap();
    let schema = update.request_body.as_ref().unwrap().content["application/json"]
        .schema
        .as_ref()
        .unwrap();
    assert_eq!(schema.reference.as_deref(), Some("#/components/schemas/PriceUpdate"));
    assert_eq!(update.parameters[0].schema.as_ref().unwrap().schema_type, Some(SchemaType::String));
}

#[test]
fn test_annotation_responses_are_additive() {
    let doc = generator().generate(&market());

    let add = doc.operation(&Method::POST, "/market").unwrap();
    let statuses: Vec<&str> = add.responses.keys().map(String::as_str).collect();
    assert_eq!(statuses, vec!["201", "409", "400", "500"]);
    assert_eq!(add.responses["201"].description, "Created");

    let update = doc.operation(&Method::PUT, "/market/{name}").unwrap();
    let ok = &update.responses["200"];
    assert_eq!(ok.description, "OK");
    assert!(ok.content.is_empty() || ok.content.values().all(|m| m.schema.is_none()));
    assert_eq!(ok.headers["x-version"].description.as_deref(), Some("Catalogue version"));
}

#[test]
fn test_default_error_responses_can_be_disabled() {
    let doc = generator().default_error_responses(false).generate(&market());
    let add = doc.operation(&Method::POST, "/market").unwrap();
    let statuses: Vec<&str> = add.responses.keys().map(String::as_str).collect();
    assert_eq!(statuses, vec!["201", "409"]);

    let doc = generator().generate(&market());
    let list = doc.operation(&Method::GET, "/market").unwrap();
    assert!(!list.responses.contains_key("400"));
    assert_eq!(
        list.responses["500"].content["application/json"]
            .schema
            .as_ref()
            .unwrap()
            .reference
            .as_deref(),
        Some("#/components/schemas/ErrorBody")
    );
}

#[test]
fn test_bind_error_documented_under_configured_status() {
    let config = RegistryConfig {
        binding: BindConfig {
            error_status: StatusCode::UNPROCESSABLE_ENTITY,
            ..BindConfig::default()
        },
        ..RegistryConfig::default()
    };
    let mut registry = Registry::new(config);
    registry.root().register(Route::post("/fruits", add));
    registry.root().register(
        Route::post("/raw", |_ctx: RequestContext, text: String| async move {
            Ok::<_, HandlerError>(text)
        })
        .bind_hook(|req: &ExtractionContext| Ok(String::from_utf8_lossy(req.body()).into_owned())),
    );
    let doc = generator().generate(&registry.build().unwrap());

    let add = doc.operation(&Method::POST, "/fruits").unwrap();
    let statuses: Vec<&str> = add.responses.keys().map(String::as_str).collect();
    assert_eq!(statuses, vec!["200", "422", "500"]);

    let raw = doc.operation(&Method::POST, "/raw").unwrap();
    assert!(raw.responses.contains_key("400"));
    assert!(!raw.responses.contains_key("422"));
}

#[test]
fn test_info_and_tags() {
    let doc = generator().generate(&market());
    assert_eq!(doc.openapi, "3.1.0");
    assert_eq!(doc.info.title, "Fruit Market");
    assert_eq!(doc.info.description.as_deref(), Some("Your daily dose of freshness"));
    assert_eq!(doc.tags.len(), 1);
    assert_eq!(doc.tags[0].name, "market");
}

#[test]
fn test_paths_follow_registration_order() {
    let doc = generator().generate(&market());
    let paths: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/market", "/market/{name}"]);
}

#[test]
fn test_generation_is_idempotent() {
    let api = market();
    let generator = generator();
    let first = generator.generate(&api);
    let second = generator.generate(&api);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.to_yaml().unwrap(), second.to_yaml().unwrap());
}
