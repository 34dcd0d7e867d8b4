//! Error types for the read endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clientele_registry::RegistryError;
use serde_json::json;
use thiserror::Error;

/// Errors returned to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No verified caller identity on the request.
    #[error("Missing authenticated caller identity")]
    Unauthenticated,

    /// The caller is authenticated but lacks the required scope.
    #[error("Caller lacks required scope '{0}'")]
    MissingScope(String),

    /// The client store could not be queried.
    #[error("Client store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MissingScope(_) => StatusCode::FORBIDDEN,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "code": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
