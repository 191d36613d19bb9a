//! HTTP API tests: router, serialization and error bodies.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use kisan_mitra::flows::Assistant;
use kisan_mitra::normalize::{Normalizer, RewriteMode};
use kisan_mitra::server::routes::ServerState;
use kisan_mitra::server::build_router;
use kisan_mitra::weather::WeatherClient;

use crate::mock_gateway::MockGateway;

fn router_with(gateway: Arc<MockGateway>) -> axum::Router {
    let assistant = Assistant::new(Some(gateway), Normalizer::new(RewriteMode::SinglePass));
    let weather = WeatherClient::new(None, "metric").unwrap();
    build_router(Arc::new(ServerState::new(
        assistant,
        weather,
        "KISAN-MITRA".to_string(),
    )))
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn prices_endpoint_returns_records() {
    let gateway = Arc::new(MockGateway::new());
    gateway.push_response("Ludhiana Mandi: ₹2150/quintal (01/03/2025)");
    let app = router_with(gateway);

    let resp = app
        .oneshot(post("/api/prices", r#"{"query": "Wheat price in Punjab"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["records"][0]["market"], "Ludhiana Mandi");
    assert_eq!(body["records"][0]["price"], "₹2150/quintal");
    assert_eq!(body["estimated"], false);
}

#[tokio::test]
async fn prices_endpoint_degrades_to_estimates_on_gateway_failure() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_error("upstream down");
    let app = router_with(gateway);

    let resp = app
        .oneshot(post("/api/prices", r#"{"query": "onion price"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["estimated"], true);
    assert_eq!(body["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_query_gets_sample_suggestions() {
    let app = router_with(Arc::new(MockGateway::new()));

    let resp = app
        .oneshot(post("/api/prices", r#"{"query": ""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 9);
    assert!(suggestions[0].as_str().unwrap().contains("price in"));
}

#[tokio::test]
async fn advice_endpoint_round_trip() {
    let gateway = Arc::new(MockGateway::new());
    gateway.push_response("Mulch heavily and irrigate in the evening.");
    let app = router_with(gateway);

    let resp = app
        .oneshot(post(
            "/api/advice",
            r#"{"crop_type": "Tomato", "region": "Karnataka", "query": "summer care"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert!(body["advice"].as_str().unwrap().contains("Mulch"));
}

#[tokio::test]
async fn schemes_endpoint_round_trip() {
    let gateway = Arc::new(MockGateway::new());
    gateway.push_response("The PM-KISAN scheme provides ₹6000 per year.");
    let app = router_with(gateway);

    let resp = app
        .oneshot(post(
            "/api/schemes",
            r#"{"location": "Bihar", "query": "income support"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert!(body["schemes"].as_str().unwrap().contains("PM-KISAN"));
}

#[tokio::test]
async fn suggestions_endpoint_serializes_camel_case() {
    let gateway = Arc::new(MockGateway::new());
    gateway.push_response(
        r#"[{"name": "Groundnut", "yieldEstimate": "1 ton/acre",
             "growthDuration": "4 months", "marketValue": "INR 60/kg"}]"#,
    );
    let app = router_with(gateway);

    let resp = app
        .oneshot(post(
            "/api/suggestions",
            r#"{"soil_type": "red", "location": "Anantapur", "season": "Autumn"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["crops"][0]["name"], "Groundnut");
    assert_eq!(body["crops"][0]["yieldEstimate"], "1 ton/acre");
    assert_eq!(body["crops"][0]["growthDuration"], "4 months");
}

#[tokio::test]
async fn gateway_failure_on_advice_is_bad_gateway() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_error("boom");
    let app = router_with(gateway);

    let resp = app
        .oneshot(post(
            "/api/advice",
            r#"{"crop_type": "Rice", "region": "Odisha", "query": "drainage"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("mock-model"));
    assert!(body.get("suggestions").is_none());
}

#[tokio::test]
async fn health_reports_assistant_name() {
    let app = router_with(Arc::new(MockGateway::new()));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["assistant"], "KISAN-MITRA");
}
