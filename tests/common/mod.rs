// SPDX-License-Identifier: MIT

//! Shared test helpers.

use fitspark_sync::config::Config;
use fitspark_sync::db::FirestoreDb;
use fitspark_sync::routes::create_router;
use fitspark_sync::services::GoogleFitClient;
use fitspark_sync::AppState;
use std::sync::Arc;

/// Offline Firestore client; any database call returns an error.
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build a test app with an offline database and a known API key.
pub fn create_test_app() -> (axum::Router, String) {
    let config = Config::default();
    let api_key = config.api_secret_key.clone();

    let fit = GoogleFitClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    let state = Arc::new(AppState {
        config,
        db: test_db_offline(),
        fit,
    });

    (create_router(state), api_key)
}
