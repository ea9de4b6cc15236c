use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use directory_metrics::TracingService;
use directory_models::DirectoryError;

pub const API_KEY_HEADER: &str = "x-api-key";
const MAX_API_KEY_LEN: usize = 256;

fn header_value(headers: &HeaderMap, key: &str, max_len: usize) -> Option<String> {
    let raw = headers.get(key)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > max_len {
        return None;
    }
    Some(raw.to_string())
}

/// Check `X-API-Key` against the configured key.
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), DirectoryError> {
    match header_value(headers, API_KEY_HEADER, MAX_API_KEY_LEN) {
        None => Err(DirectoryError::MissingApiKey),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(DirectoryError::InvalidApiKey),
    }
}

pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Err(e) = verify_api_key(req.headers(), &state.config.auth.api_key) {
        let reason = match e {
            DirectoryError::MissingApiKey => "missing",
            _ => "invalid",
        };
        state.metrics.record_api_key_rejection(reason);
        TracingService::log_api_key_rejected(req.uri().path(), reason);
        let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::FORBIDDEN);
        return (status, Json(e.to_error_shape())).into_response();
    }
    next.run(req).await
}
