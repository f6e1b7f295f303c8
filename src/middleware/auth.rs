// SPDX-License-Identifier: MIT

//! Bearer-key authentication middleware for the job triggers.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Require `Authorization: Bearer <API_SECRET_KEY>` on job trigger routes.
///
/// The comparison is constant-time; rejection happens before any job
/// work begins.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => {
            tracing::warn!("Blocked job trigger without bearer token");
            return Err(AppError::Unauthorized);
        }
    };

    let expected = state.config.api_secret_key.as_bytes();
    if bool::from(token.as_bytes().ct_eq(expected)) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Blocked job trigger with invalid API key");
        Err(AppError::Unauthorized)
    }
}
