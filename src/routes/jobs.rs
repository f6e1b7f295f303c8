// SPDX-License-Identifier: MIT

//! Job trigger routes.
//!
//! Called by an external scheduler or operator, not by end users. Both
//! routes sit behind the bearer-key middleware applied in routes/mod.rs.

use crate::error::{AppError, Result};
use crate::services::{
    FitnessSyncService, LeaderboardReport, LeaderboardService, SyncReport,
};
use crate::AppState;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Job trigger routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sync-google-fit", post(sync_google_fit))
        .route("/api/update-leaderboards", post(update_leaderboards))
}

/// Run a full Google Fit sync pass. Request body is ignored.
async fn sync_google_fit(State(state): State<Arc<AppState>>) -> Result<Json<SyncReport>> {
    let sync = FitnessSyncService::new(state.db.clone(), state.fit.clone());
    let report = sync.run().await?;
    Ok(Json(report))
}

/// Request body for a leaderboard update.
///
/// Both fields are required; they are optional here only so the missing
/// case produces the documented error message instead of a serde reject.
#[derive(Debug, Deserialize)]
pub struct LeaderboardRequest {
    pub month: Option<String>,
    pub year: Option<i32>,
}

/// Recompute the leaderboard for the requested month.
async fn update_leaderboards(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LeaderboardRequest>,
) -> Result<Json<LeaderboardReport>> {
    let (Some(month), Some(year)) = (request.month, request.year) else {
        return Err(AppError::BadRequest(
            "Month and year are required".to_string(),
        ));
    };

    let leaderboard = LeaderboardService::new(state.db.clone());
    let report = leaderboard.run(&month, year).await?;
    Ok(Json(report))
}
