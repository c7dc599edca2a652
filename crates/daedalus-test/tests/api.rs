//! The test client against a built registry.

use daedalus_core::{HandlerError, Registry, RequestContext, Route};
use daedalus_schema::Describe;
use daedalus_test::TestClient;
use http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Describe)]
struct Fruit {
    name: String,
    price: f64,
}

async fn echo(_ctx: RequestContext, fruit: Fruit) -> Result<Fruit, HandlerError> {
    Ok(fruit)
}

fn client() -> TestClient<daedalus_core::Api> {
    let mut registry = Registry::default();
    registry.root().register(Route::post("/fruits", echo));
    TestClient::new(registry.build().unwrap())
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = client()
        .post("/fruits")
        .header("x-request-id", "0190b2a4-5c2e-7d3a-8f00-000000000001")
        .json(&Fruit {
            name: "fig".to_string(),
            price: 4.0,
        })
        .send()
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.header_str("x-request-id"),
        Some("0190b2a4-5c2e-7d3a-8f00-000000000001")
    );
    let fruit: Fruit = response.json().unwrap();
    assert_eq!(fruit.name, "fig");
}

#[tokio::test]
async fn test_form_and_yaml_round() {
    let client = client();

    let response = client
        .post("/fruits")
        .form(&[("name", "date"), ("price", "6.5")])
        .accept("application/yaml")
        .send()
        .await;
    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/yaml");
    let fruit: Fruit = response.yaml().unwrap();
    assert_eq!(
        fruit,
        Fruit {
            name: "date".to_string(),
            price: 6.5
        }
    );
}

#[tokio::test]
async fn test_unsupported_media_type() {
    client()
        .post("/fruits")
        .content_type("text/csv")
        .body("fig,4")
        .send()
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
        .assert_body_contains("decode-error");
}
