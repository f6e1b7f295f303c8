//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const DAILY_ACTIVITY_LOGS: &str = "dailyActivityLogs";
    pub const TEAMS: &str = "teams";
    /// One document per (year, month), keyed `{year}-{month}`
    pub const MONTHLY_LEADERBOARDS: &str = "monthlyLeaderboards";
}
