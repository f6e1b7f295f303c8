// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Google Fit API error: {0}")]
    GoogleFit(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker message for a revoked/expired Google Fit grant.
    ///
    /// A revoked grant triggers a permanent local disconnect instead of
    /// being retried on every future sync run.
    pub const FIT_TOKEN_REVOKED: &'static str = "Google Fit token revoked (invalid_grant)";

    /// Whether this error indicates the user's Google Fit consent is gone.
    pub fn is_fit_token_revoked(&self) -> bool {
        matches!(self, AppError::GoogleFit(msg) if msg == Self::FIT_TOKEN_REVOKED)
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoRefreshToken => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::GoogleFit(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
