//! User model for storage and leaderboard display.

use serde::{Deserialize, Serialize};

/// User profile stored in the `users` collection, keyed by `uid`.
///
/// Only the Google Fit linkage fields are touched by this service; the
/// rest of the profile belongs to the web app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Firebase Auth UID (also used as document ID)
    pub uid: String,
    /// Display name (may be absent if never set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the user has linked a Google Fit account
    #[serde(default)]
    pub google_fit_connected: bool,
    /// OAuth refresh token for the Google Fit API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_fit_refresh_token: Option<String>,
    /// Last successful sync timestamp (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_fit_last_sync: Option<String>,
    /// Team membership, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl User {
    /// Name shown on leaderboards: display name, else email, else uid.
    pub fn leaderboard_name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.uid.clone())
    }
}
