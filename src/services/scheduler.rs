// SPDX-License-Identifier: MIT

//! In-process daily scheduler.
//!
//! Replaces the external cron/Cloud Scheduler tick: sleeps until the
//! configured hour UTC, runs the Google Fit sync, then recomputes the
//! current month's leaderboard. Job failures are logged; the next tick
//! is the only retry mechanism.

use crate::services::{FitnessSyncService, LeaderboardService};
use crate::time_utils::{current_month_year, duration_until_next_tick};
use crate::AppState;
use chrono::Utc;
use std::sync::Arc;

/// Spawn the scheduler loop onto the runtime.
pub fn spawn(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_loop(state))
}

async fn run_loop(state: Arc<AppState>) {
    loop {
        let wait = duration_until_next_tick(Utc::now(), state.config.sync_hour_utc);
        tracing::info!(
            seconds = wait.as_secs(),
            "Scheduler sleeping until next daily tick"
        );
        tokio::time::sleep(wait).await;

        run_scheduled_jobs(&state).await;
    }
}

/// One scheduled run: sync first, then the current month's leaderboard.
pub async fn run_scheduled_jobs(state: &AppState) {
    let sync = FitnessSyncService::new(state.db.clone(), state.fit.clone());
    match sync.run().await {
        Ok(report) => tracing::info!(
            synced_users = report.synced_users,
            total = report.results.len(),
            "Scheduled sync completed"
        ),
        Err(e) => tracing::error!(error = %e, "Scheduled sync failed"),
    }

    let (month, year) = current_month_year(Utc::now());
    let leaderboard = LeaderboardService::new(state.db.clone());
    match leaderboard.run(&month, year).await {
        Ok(report) => tracing::info!(
            teams_count = report.teams_count,
            month = %report.month,
            year = report.year,
            "Scheduled leaderboard update completed"
        ),
        Err(e) => tracing::error!(error = %e, "Scheduled leaderboard update failed"),
    }
}
