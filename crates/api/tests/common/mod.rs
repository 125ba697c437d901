#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use promo_core::service::PromotionService;
use promo_core::store::MemoryPromotionStore;
use serde_json::{json, Value};
use tower::ServiceExt;

use promo_api::config::{LogFormat, ServerConfig};
use promo_api::router::build_app_router;
use promo_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        database_max_connections: 1,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router backed by a fresh in-memory store.
///
/// Goes through `build_app_router` so tests see the same middleware stack
/// as the binary. The returned router is cheap to clone and every clone
/// shares the same store.
pub fn build_test_app() -> Router {
    let state = AppState {
        promotions: PromotionService::new(Arc::new(MemoryPromotionStore::new())),
    };
    build_app_router(state, &test_config())
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// PUT without a body, for the validity endpoint.
pub async fn put(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete, valid create body.
pub fn sample_promotion(name: &str, product_id: i64) -> Value {
    json!({
        "name": name,
        "category": "PERCENTAGE_DISCOUNT_X",
        "discount_x": 20,
        "product_id": product_id,
        "description": "Twenty percent off",
        "validity": true,
        "start_date": "2024-01-01",
        "end_date": "2024-03-31"
    })
}

/// Create a promotion through the API and return its JSON representation.
pub async fn create_promotion(app: &Router, body: Value) -> Value {
    let response = post_json(app, "/promotions", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}
