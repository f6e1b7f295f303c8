// SPDX-License-Identifier: MIT

//! Google Fit sync job.
//!
//! Pulls the trailing 7 days of step and calorie data for every user
//! with a linked Google Fit account and merges per-day aggregates into
//! the daily activity log collection. One sequential pass; each user's
//! failure is recorded and does not abort the batch.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{DailyActivityLog, User};
use crate::services::google_fit::{AggregateRequest, GoogleFitClient};
use crate::time_utils::format_utc_rfc3339;
use chrono::{Duration, Utc};
use serde::Serialize;

/// Trailing sync window.
const SYNC_WINDOW_DAYS: i64 = 7;

/// Google Fit sync job.
pub struct FitnessSyncService {
    db: FirestoreDb,
    fit: GoogleFitClient,
}

/// Batch result returned to HTTP callers and logged by the scheduler.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub message: String,
    pub results: Vec<UserSyncResult>,
    pub synced_users: usize,
}

/// Per-user outcome within a sync run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSyncResult {
    pub user_id: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

impl FitnessSyncService {
    pub fn new(db: FirestoreDb, fit: GoogleFitClient) -> Self {
        Self { db, fit }
    }

    /// Run a full sync pass over all connected users.
    pub async fn run(&self) -> Result<SyncReport> {
        let users = self.db.get_connected_users().await?;

        if users.is_empty() {
            tracing::info!("No users with Google Fit connected");
            return Ok(SyncReport {
                message: "No users to sync".to_string(),
                results: Vec::new(),
                synced_users: 0,
            });
        }

        tracing::info!(count = users.len(), "Starting Google Fit data sync");

        let mut results = Vec::with_capacity(users.len());
        for user in &users {
            match self.sync_user(user).await {
                Ok(()) => {
                    tracing::debug!(user_id = %user.uid, "User synced");
                    results.push(UserSyncResult {
                        user_id: user.uid.clone(),
                        status: SyncStatus::Success,
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::error!(user_id = %user.uid, error = %e, "Failed to sync user");

                    // Revoked consent is permanent: disconnect so the dead
                    // credential is not retried on every future run.
                    if e.is_fit_token_revoked() {
                        match self.db.disconnect_google_fit(&user.uid).await {
                            Ok(()) => tracing::info!(
                                user_id = %user.uid,
                                "Google Fit consent revoked, user disconnected"
                            ),
                            Err(db_err) => tracing::error!(
                                user_id = %user.uid,
                                error = %db_err,
                                "Failed to disconnect revoked user"
                            ),
                        }
                    }

                    results.push(UserSyncResult {
                        user_id: user.uid.clone(),
                        status: SyncStatus::Error,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let synced_users = results
            .iter()
            .filter(|r| r.status == SyncStatus::Success)
            .count();

        tracing::info!(
            synced_users,
            total = results.len(),
            "Google Fit data sync completed"
        );

        Ok(SyncReport {
            message: "Sync completed".to_string(),
            results,
            synced_users,
        })
    }

    /// Sync one user: token exchange, steps pass, calories pass, stamp.
    async fn sync_user(&self, user: &User) -> Result<()> {
        let refresh_token = user
            .google_fit_refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AppError::NoRefreshToken)?;

        let access_token = self.fit.refresh_access_token(refresh_token).await?;

        let end = Utc::now();
        let start = end - Duration::days(SYNC_WINDOW_DAYS);
        let (start_ms, end_ms) = (start.timestamp_millis(), end.timestamp_millis());

        self.sync_steps(&access_token, &user.uid, start_ms, end_ms)
            .await?;
        self.sync_calories(&access_token, &user.uid, start_ms, end_ms)
            .await?;

        self.db
            .touch_last_sync(&user.uid, &format_utc_rfc3339(Utc::now()))
            .await?;

        Ok(())
    }

    async fn sync_steps(
        &self,
        access_token: &str,
        user_id: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<()> {
        let response = self
            .fit
            .aggregate(access_token, &AggregateRequest::steps(start_ms, end_ms))
            .await?;

        let now = format_utc_rfc3339(Utc::now());
        for bucket in &response.bucket {
            let Some(date) = bucket.date() else {
                tracing::warn!(user_id, "Skipping bucket with unparseable start time");
                continue;
            };

            // Only positive totals are persisted; a zero day leaves no row
            let steps = bucket.total_steps();
            if steps <= 0 {
                continue;
            }

            let log = DailyActivityLog::steps_entry(user_id, date, steps, &now);
            self.db.merge_daily_steps(&log).await?;
        }

        Ok(())
    }

    async fn sync_calories(
        &self,
        access_token: &str,
        user_id: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<()> {
        let response = self
            .fit
            .aggregate(access_token, &AggregateRequest::calories(start_ms, end_ms))
            .await?;

        let now = format_utc_rfc3339(Utc::now());
        for bucket in &response.bucket {
            let Some(date) = bucket.date() else {
                tracing::warn!(user_id, "Skipping bucket with unparseable start time");
                continue;
            };

            let calories = bucket.total_calories();
            if calories <= 0.0 {
                continue;
            }

            let log = DailyActivityLog::calories_entry(user_id, date, calories, &now);
            self.db.merge_daily_calories(&log).await?;
        }

        Ok(())
    }
}
