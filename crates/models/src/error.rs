use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ErrorShape {
    pub detail: String,
    pub error_type: String,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Organization not found")]
    OrganizationNotFound { organization_id: i64 },

    #[error("Building not found: {building_id}")]
    BuildingNotFound { building_id: i64 },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Request body too large: {reason}")]
    RequestTooLarge { reason: String },

    #[error("Missing API Key")]
    MissingApiKey,

    #[error("Invalid API Key")]
    InvalidApiKey,

    #[error("Internal server error: {reason}")]
    InternalError { reason: String },

    #[error("Database error: {reason}")]
    DatabaseError { reason: String },

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

impl DirectoryError {
    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            detail: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            DirectoryError::OrganizationNotFound { .. } => "ResourceNotFound",
            DirectoryError::BuildingNotFound { .. } => "ResourceNotFound",
            DirectoryError::InvalidRequest { .. } => "InvalidParameterValue",
            DirectoryError::RequestTooLarge { .. } => "RequestTooLarge",
            DirectoryError::MissingApiKey => "Unauthorized",
            DirectoryError::InvalidApiKey => "Forbidden",
            DirectoryError::InternalError { .. } => "ServiceException",
            DirectoryError::DatabaseError { .. } => "ServiceException",
            DirectoryError::SqlxError(_) => "ServiceException",
            DirectoryError::ConfigError { .. } => "ServiceException",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            DirectoryError::OrganizationNotFound { .. } => 404,
            DirectoryError::BuildingNotFound { .. } => 404,
            DirectoryError::InvalidRequest { .. } => 400,
            DirectoryError::RequestTooLarge { .. } => 413,
            DirectoryError::MissingApiKey => 401,
            DirectoryError::InvalidApiKey => 403,
            DirectoryError::InternalError { .. } => 500,
            DirectoryError::DatabaseError { .. } => 500,
            DirectoryError::SqlxError(_) => 500,
            DirectoryError::ConfigError { .. } => 500,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        DirectoryError::InvalidRequest {
            reason: reason.into(),
        }
    }
}
