// SPDX-License-Identifier: MIT

//! Data models for the application.
//!
//! All persisted documents keep the camelCase field names of the
//! Firestore collections they live in.

pub mod activity;
pub mod leaderboard;
pub mod team;
pub mod user;

pub use activity::DailyActivityLog;
pub use leaderboard::{MonthlyLeaderboard, TeamLeaderboardEntry, TeamMemberStats};
pub use team::Team;
pub use user::User;
