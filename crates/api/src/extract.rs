use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use directory_models::DirectoryError;
use tracing::warn;

/// Extractor failure rendered as an `ErrorShape` body.
#[derive(Debug)]
pub struct Rejected(pub DirectoryError);

impl IntoResponse for Rejected {
    fn into_response(self) -> Response {
        warn!("Request rejected: {}", self.0);
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self.0.to_error_shape())).into_response()
    }
}

impl From<JsonRejection> for Rejected {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self(DirectoryError::RequestTooLarge {
                reason: rejection.body_text(),
            });
        }
        Self(DirectoryError::invalid(rejection.body_text()))
    }
}

impl From<QueryRejection> for Rejected {
    fn from(rejection: QueryRejection) -> Self {
        Self(DirectoryError::invalid(rejection.body_text()))
    }
}

impl From<PathRejection> for Rejected {
    fn from(rejection: PathRejection) -> Self {
        Self(DirectoryError::invalid(rejection.body_text()))
    }
}

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Rejected))]
pub struct ValidJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Rejected))]
pub struct ValidQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Rejected))]
pub struct ValidPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_maps_to_bad_request_shape() {
        let response = Rejected(DirectoryError::invalid("missing field `name`")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn oversized_body_keeps_payload_too_large() {
        let response = Rejected(DirectoryError::RequestTooLarge {
            reason: "length limit exceeded".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
