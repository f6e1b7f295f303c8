//! Monthly leaderboard documents.
//!
//! One document per (year, month) in `monthlyLeaderboards`, holding the
//! full ranked `teams` array. The array is recomputed and replaced
//! wholesale on every aggregation run; there is no incremental update.

use crate::models::Team;
use serde::{Deserialize, Serialize};

/// Per-member aggregate embedded in a team entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberStats {
    pub user_id: String,
    pub display_name: String,
    pub steps: i64,
    pub calories: f64,
}

/// One team's row on a monthly leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeaderboardEntry {
    pub team_id: String,
    pub team_name: String,
    pub total_steps: i64,
    pub total_calories: f64,
    /// Size of the membership snapshot, including members that were
    /// skipped because their user document or stats could not be read.
    pub member_count: usize,
    /// Members sorted by steps descending
    pub members: Vec<TeamMemberStats>,
}

impl TeamLeaderboardEntry {
    /// Build a team entry from the member aggregates that resolved.
    ///
    /// Members are sorted by steps descending; team totals are the sums
    /// of the member values.
    pub fn new(team: &Team, mut members: Vec<TeamMemberStats>) -> Self {
        members.sort_by(|a, b| b.steps.cmp(&a.steps));

        let total_steps = members.iter().map(|m| m.steps).sum();
        let total_calories = members.iter().map(|m| m.calories).sum();

        Self {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            total_steps,
            total_calories,
            member_count: team.member_ids.len(),
            members,
        }
    }
}

/// Leaderboard document keyed `{year}-{month}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyLeaderboard {
    pub id: String,
    pub month: String,
    pub year: i32,
    pub teams: Vec<TeamLeaderboardEntry>,
    pub last_updated: String,
}

impl MonthlyLeaderboard {
    /// Document id for a month, e.g. `2024-March`.
    pub fn doc_id(month: &str, year: i32) -> String {
        format!("{}-{}", year, month)
    }
}

/// Rank teams by total steps descending.
///
/// The sort is stable, so teams tied on steps keep the order the team
/// query returned them in. Calories are carried but never a sort key.
pub fn rank_teams(entries: &mut [TeamLeaderboardEntry]) {
    entries.sort_by(|a, b| b.total_steps.cmp(&a.total_steps));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, member_ids: &[&str]) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {}", id),
            member_ids: member_ids.iter().map(|m| m.to_string()).collect(),
            is_active: true,
        }
    }

    fn member(user_id: &str, steps: i64, calories: f64) -> TeamMemberStats {
        TeamMemberStats {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            steps,
            calories,
        }
    }

    #[test]
    fn test_entry_totals_and_member_order() {
        let team = team("t1", &["a", "b"]);
        let entry = TeamLeaderboardEntry::new(
            &team,
            vec![member("b", 3000, 500.0), member("a", 5000, 300.0)],
        );

        assert_eq!(entry.total_steps, 8000);
        assert_eq!(entry.total_calories, 800.0);
        assert_eq!(entry.member_count, 2);
        // Sorted by steps descending: a before b
        assert_eq!(entry.members[0].user_id, "a");
        assert_eq!(entry.members[1].user_id, "b");
    }

    #[test]
    fn test_member_count_includes_skipped_members() {
        // Two members in the snapshot but only one resolved
        let team = team("t1", &["a", "ghost"]);
        let entry = TeamLeaderboardEntry::new(&team, vec![member("a", 100, 1.0)]);

        assert_eq!(entry.member_count, 2);
        assert_eq!(entry.members.len(), 1);
    }

    #[test]
    fn test_totals_match_member_sums() {
        let team = team("t1", &["a", "b", "c"]);
        let entry = TeamLeaderboardEntry::new(
            &team,
            vec![
                member("a", 1234, 56.7),
                member("b", 0, 0.0),
                member("c", 8766, 43.3),
            ],
        );

        let member_steps: i64 = entry.members.iter().map(|m| m.steps).sum();
        assert_eq!(entry.total_steps, member_steps);
        assert_eq!(entry.total_steps, 10000);
    }

    #[test]
    fn test_rank_teams_descending() {
        let mut entries = vec![
            TeamLeaderboardEntry::new(&team("low", &[]), vec![member("x", 100, 0.0)]),
            TeamLeaderboardEntry::new(&team("high", &[]), vec![member("y", 9000, 0.0)]),
            TeamLeaderboardEntry::new(&team("mid", &[]), vec![member("z", 4500, 0.0)]),
        ];

        rank_teams(&mut entries);

        let ids: Vec<&str> = entries.iter().map(|e| e.team_id.as_str()).collect();
        assert_eq!(ids, ["high", "mid", "low"]);
        for pair in entries.windows(2) {
            assert!(pair[0].total_steps >= pair[1].total_steps);
        }
    }

    #[test]
    fn test_rank_teams_ties_keep_query_order() {
        // All tied at zero: order must stay as returned by the team query
        let mut entries = vec![
            TeamLeaderboardEntry::new(&team("first", &[]), vec![]),
            TeamLeaderboardEntry::new(&team("second", &[]), vec![]),
            TeamLeaderboardEntry::new(&team("third", &[]), vec![]),
        ];

        rank_teams(&mut entries);

        let ids: Vec<&str> = entries.iter().map(|e| e.team_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_leaderboard_doc_id() {
        assert_eq!(MonthlyLeaderboard::doc_id("March", 2024), "2024-March");
    }

    #[test]
    fn test_camel_case_wire_names() {
        let entry = TeamLeaderboardEntry::new(&team("t1", &["a"]), vec![member("a", 10, 2.0)]);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["teamId"], "t1");
        assert_eq!(json["totalSteps"], 10);
        assert_eq!(json["totalCalories"], 2.0);
        assert_eq!(json["memberCount"], 1);
        assert_eq!(json["members"][0]["userId"], "a");
        assert_eq!(json["members"][0]["displayName"], "a");
    }
}
