// SPDX-License-Identifier: MIT

//! Monthly leaderboard aggregation job.
//!
//! For every active team, sums each member's daily activity rows over a
//! calendar month, ranks teams by total steps, and writes one
//! leaderboard document per (year, month). The whole document is
//! recomputed each run; re-running for the same month is idempotent
//! given unchanged activity data.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{
    leaderboard::rank_teams, MonthlyLeaderboard, Team, TeamLeaderboardEntry, TeamMemberStats,
};
use crate::time_utils::{format_utc_rfc3339, month_range};
use chrono::Utc;
use serde::Serialize;

/// Monthly leaderboard aggregation job.
pub struct LeaderboardService {
    db: FirestoreDb,
}

/// Result returned to HTTP callers and logged by the scheduler.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardReport {
    pub message: String,
    pub teams_count: usize,
    pub month: String,
    pub year: i32,
}

impl LeaderboardService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Recompute the leaderboard for one calendar month.
    pub async fn run(&self, month: &str, year: i32) -> Result<LeaderboardReport> {
        // Unrecognized month names are rejected up front instead of
        // silently producing an empty date range.
        let (start_date, end_date) = month_range(month, year)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid month name: {}", month)))?;

        tracing::info!(month, year, "Updating leaderboard");

        let teams = self.db.get_active_teams().await?;
        if teams.is_empty() {
            tracing::info!("No active teams found");
            return Ok(LeaderboardReport {
                message: "No active teams found".to_string(),
                teams_count: 0,
                month: month.to_string(),
                year,
            });
        }

        tracing::info!(count = teams.len(), "Found active teams");

        let mut entries = Vec::with_capacity(teams.len());
        for team in &teams {
            match self.team_entry(team, &start_date, &end_date).await {
                Ok(entry) => entries.push(entry),
                // A failed team is omitted from this run's leaderboard
                Err(e) => tracing::error!(
                    team_id = %team.id,
                    error = %e,
                    "Failed to aggregate team, omitting from leaderboard"
                ),
            }
        }

        rank_teams(&mut entries);

        let board = MonthlyLeaderboard {
            id: MonthlyLeaderboard::doc_id(month, year),
            month: month.to_string(),
            year,
            teams: entries,
            last_updated: format_utc_rfc3339(Utc::now()),
        };
        let teams_count = board.teams.len();

        self.db.set_monthly_leaderboard(&board).await?;

        tracing::info!(teams_count, month, year, "Leaderboard updated");

        Ok(LeaderboardReport {
            message: "Leaderboard updated successfully".to_string(),
            teams_count,
            month: month.to_string(),
            year,
        })
    }

    /// Aggregate one team over the date range.
    ///
    /// A member whose lookup fails is logged and skipped; the rest of the
    /// team still aggregates.
    async fn team_entry(
        &self,
        team: &Team,
        start_date: &str,
        end_date: &str,
    ) -> Result<TeamLeaderboardEntry> {
        let mut members = Vec::with_capacity(team.member_ids.len());

        for member_id in &team.member_ids {
            match self.member_stats(member_id, start_date, end_date).await {
                Ok(Some(stats)) => members.push(stats),
                Ok(None) => {
                    tracing::debug!(member_id, "Member has no user document, skipping")
                }
                Err(e) => tracing::warn!(
                    member_id,
                    error = %e,
                    "Failed to aggregate member, skipping"
                ),
            }
        }

        Ok(TeamLeaderboardEntry::new(team, members))
    }

    /// Sum one member's activity rows over the date range.
    ///
    /// Returns `None` when the user document does not exist.
    async fn member_stats(
        &self,
        member_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Option<TeamMemberStats>> {
        let Some(user) = self.db.get_user(member_id).await? else {
            return Ok(None);
        };

        let logs = self
            .db
            .get_activity_logs_in_range(member_id, start_date, end_date)
            .await?;

        let steps = logs.iter().map(|l| l.steps).sum();
        let calories = logs.iter().map(|l| l.calories).sum();

        Ok(Some(TeamMemberStats {
            user_id: member_id.to_string(),
            display_name: user.leaderboard_name(),
            steps,
            calories,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_rejects_invalid_month_before_touching_db() {
        let service = LeaderboardService::new(FirestoreDb::new_mock());

        let err = service
            .run("Marchtober", 2024)
            .await
            .expect_err("invalid month should fail");

        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid month name: Marchtober"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_offline_db_is_systemic_failure() {
        let service = LeaderboardService::new(FirestoreDb::new_mock());

        let err = service.run("March", 2024).await.expect_err("offline db");
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_report_wire_shape() {
        let report = LeaderboardReport {
            message: "No active teams found".to_string(),
            teams_count: 0,
            month: "March".to_string(),
            year: 2024,
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["teamsCount"], 0);
        assert_eq!(json["month"], "March");
        assert_eq!(json["year"], 2024);
    }
}
