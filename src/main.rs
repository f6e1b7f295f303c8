// SPDX-License-Identifier: MIT

//! FitSpark Sync API Server
//!
//! Syncs Google Fit activity data for connected users and recomputes
//! monthly team leaderboards, on a daily schedule or via HTTP triggers.

use fitspark_sync::{
    config::Config,
    db::FirestoreDb,
    services::{scheduler, GoogleFitClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting FitSpark sync service");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.firebase_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Google Fit API client (shared OAuth credentials)
    let fit = GoogleFitClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        fit,
    });

    // Daily scheduled sync + leaderboard update.
    // Disabled when an external scheduler calls the HTTP triggers instead.
    if state.config.scheduler_enabled {
        let _ = scheduler::spawn(state.clone());
        tracing::info!(
            hour_utc = state.config.sync_hour_utc,
            "Daily scheduler started"
        );
    }

    // Build router
    let app = fitspark_sync::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitspark_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
