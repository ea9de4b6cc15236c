use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use directory_api::{build_app, AppState};
use directory_catalog::Catalog;
use directory_metrics::MetricsService;
use directory_models::Config;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const API_KEY: &str = "SECRET_KEY123";

pub async fn create_test_app_state() -> AppState {
    let config = Config::default();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let catalog = Catalog::new(pool).await.unwrap();
    catalog.seed_if_empty().await.unwrap();

    AppState::new(
        config,
        Arc::new(catalog),
        Arc::new(MetricsService::new().unwrap()),
    )
}

pub async fn test_app() -> Router {
    build_app(create_test_app_state().await)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header("X-API-Key", API_KEY)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("X-API-Key", API_KEY)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and decode the body as JSON (Null when empty or not JSON).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[allow(dead_code)]
pub fn names(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|org| org["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// `path?key=value` with the value form-encoded (the seeded data is Cyrillic).
#[allow(dead_code)]
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    format!("{path}?{query}")
}
