// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod google_fit;
pub mod leaderboard;
pub mod scheduler;
pub mod sync;

pub use google_fit::GoogleFitClient;
pub use leaderboard::{LeaderboardReport, LeaderboardService};
pub use sync::{FitnessSyncService, SyncReport};
