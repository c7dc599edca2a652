//! Request dispatch through a built registry.

use bytes::Bytes;
use daedalus_core::{
    Api, HandlerError, Registry, RequestContext, Route, REQUEST_ID_HEADER,
};
use daedalus_extract::{BindError, ExtractionContext};
use daedalus_schema::Describe;
use http::{header, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, Describe)]
struct Fruit {
    name: String,
    price: Option<f64>,
}

async fn list(_ctx: RequestContext, _input: ()) -> Result<Vec<Fruit>, HandlerError> {
    Ok(vec![Fruit {
        name: "apple".to_string(),
        price: Some(1.5),
    }])
}

async fn add(_ctx: RequestContext, fruit: Fruit) -> Result<Fruit, HandlerError> {
    if fruit.name == "durian" {
        return Err(HandlerError::unprocessable("durian is not welcome"));
    }
    Ok(fruit)
}

fn api() -> Api {
    let mut registry = Registry::default();
    let mut market = registry.group("market", "market", "Your daily dose of freshness");
    market.register(Route::get("", list));
    market.register(Route::post("", add).status(StatusCode::CREATED));
    market.register(
        Route::get("/health", |_ctx: RequestContext, (): ()| async move {
            Ok::<_, HandlerError>(42_u32)
        })
        .render_hook(|_: u32| "OK"),
    );
    market.register(
        Route::post("/shout", |_ctx: RequestContext, text: String| async move {
            Ok::<_, HandlerError>(text)
        })
        .bind_hook(|req: &ExtractionContext| {
            std::str::from_utf8(req.body())
                .map(str::to_uppercase)
                .map_err(|e| BindError::decode(e.to_string()))
        })
        .response_media_type("text/plain"),
    );
    registry.build().unwrap()
}

fn get(path: &str) -> Request<Bytes> {
    Request::get(path).body(Bytes::new()).unwrap()
}

fn post_json(path: &str, body: &'static str) -> Request<Bytes> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn json(response: &Response<Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn test_list_renders_json() {
    let response = api().handle(get("/market")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(json(&response), serde_json::json!([{"name": "apple", "price": 1.5}]));
}

#[tokio::test]
async fn test_accept_yaml() {
    let request = Request::get("/market")
        .header(header::ACCEPT, "application/yaml")
        .body(Bytes::new())
        .unwrap();
    let response = api().handle(request).await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/yaml");
    assert!(std::str::from_utf8(response.body()).unwrap().contains("name: apple"));
}

#[tokio::test]
async fn test_optional_field_may_be_absent() {
    let response = api().handle(post_json("/market", r#"{"name":"apple"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json(&response), serde_json::json!({"name": "apple", "price": null}));
}

#[tokio::test]
async fn test_missing_required_field_is_validation_error() {
    let response = api().handle(post_json("/market", r#"{"price":1.5}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json(&response);
    assert_eq!(body["kind"], "validation-error");
    assert_eq!(body["errors"][0]["field"], "$.name");
}

#[tokio::test]
async fn test_handler_error_uses_category_status() {
    let response = api().handle(post_json("/market", r#"{"name":"durian"}"#)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(&response)["kind"], "unprocessable");
}

#[tokio::test]
async fn test_render_hook_ignores_payload() {
    let response = api().handle(get("/market/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&response.body()[..], b"OK");
}

#[tokio::test]
async fn test_bind_hook_and_text_media() {
    let request = Request::post("/market/shout")
        .body(Bytes::from_static(b"fresh figs"))
        .unwrap();
    let response = api().handle(request).await;
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(&response.body()[..], b"FRESH FIGS");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let response = api().handle(get("/orchard")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(&response)["kind"], "not-found");
}

#[tokio::test]
async fn test_wrong_method_is_405_with_allow() {
    let request = Request::delete("/market").body(Bytes::new()).unwrap();
    let response = api().handle(request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST");
}

#[tokio::test]
async fn test_head_has_no_body() {
    let request = Request::head("/market").body(Bytes::new()).unwrap();
    let response = api().handle(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let id = "0190b6c4-1f9e-7b5a-9c3e-2d4f6a8b0c1d";
    let request = Request::get("/market")
        .header(REQUEST_ID_HEADER, id)
        .body(Bytes::new())
        .unwrap();
    let response = api().handle(request).await;
    assert_eq!(response.headers()[REQUEST_ID_HEADER], id);

    let response = api().handle(get("/nowhere")).await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
