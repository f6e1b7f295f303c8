// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (Google Fit linkage fields)
//! - Daily activity logs (field-masked per-day merges)
//! - Teams (active-team queries)
//! - Monthly leaderboards (full-document upserts)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{DailyActivityLog, MonthlyLeaderboard, Team, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their Firebase UID.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All users with a linked Google Fit account.
    pub async fn get_connected_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("googleFitConnected").eq(true)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp the user's last successful Google Fit sync time.
    pub async fn touch_last_sync(&self, uid: &str, now: &str) -> Result<(), AppError> {
        let Some(mut user) = self.get_user(uid).await? else {
            tracing::warn!(uid, "User vanished before last-sync stamp");
            return Ok(());
        };
        user.google_fit_last_sync = Some(now.to_string());

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths_camel_case!(User::{google_fit_last_sync}))
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Disconnect a user whose Google Fit consent was revoked.
    ///
    /// Clears `googleFitConnected` and deletes the stored token fields so
    /// the dead credential is not retried on future runs. The fields are
    /// in the update mask but absent from the object, which removes them.
    pub async fn disconnect_google_fit(&self, uid: &str) -> Result<(), AppError> {
        let Some(mut user) = self.get_user(uid).await? else {
            return Ok(());
        };
        user.google_fit_connected = false;
        user.google_fit_refresh_token = None;
        user.google_fit_last_sync = None;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths_camel_case!(User::{
                google_fit_connected,
                google_fit_refresh_token,
                google_fit_last_sync
            }))
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Daily Activity Log Operations ───────────────────────────

    /// Merge a steps total into the user's per-day row.
    ///
    /// The update mask excludes `calories`, so a calories total written
    /// by the other sync pass survives regardless of write order.
    pub async fn merge_daily_steps(&self, log: &DailyActivityLog) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths_camel_case!(DailyActivityLog::{
                id,
                user_id,
                date,
                steps,
                source,
                synced_at,
                last_updated
            }))
            .in_col(collections::DAILY_ACTIVITY_LOGS)
            .document_id(&log.id)
            .object(log)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Merge a calories total into the user's per-day row.
    ///
    /// Mirror of [`Self::merge_daily_steps`] with `calories` in the mask
    /// instead of `steps`.
    pub async fn merge_daily_calories(&self, log: &DailyActivityLog) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths_camel_case!(DailyActivityLog::{
                id,
                user_id,
                date,
                calories,
                source,
                synced_at,
                last_updated
            }))
            .in_col(collections::DAILY_ACTIVITY_LOGS)
            .document_id(&log.id)
            .object(log)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// A user's activity rows with `date` in the inclusive range.
    pub async fn get_activity_logs_in_range(
        &self,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyActivityLog>, AppError> {
        let user_id = user_id.to_string();
        let start_date = start_date.to_string();
        let end_date = end_date.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::DAILY_ACTIVITY_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(start_date.clone()),
                    q.field("date").less_than_or_equal(end_date.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Team Operations ─────────────────────────────────────────

    /// All teams with `isActive == true`.
    pub async fn get_active_teams(&self) -> Result<Vec<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(|q| q.for_all([q.field("isActive").eq(true)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Upsert a monthly leaderboard document.
    ///
    /// The `teams` array field is replaced wholesale; a team omitted by
    /// this run is simply absent rather than carried forward stale.
    pub async fn set_monthly_leaderboard(
        &self,
        board: &MonthlyLeaderboard,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MONTHLY_LEADERBOARDS)
            .document_id(&board.id)
            .object(board)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
