//! Team model.

use serde::{Deserialize, Serialize};

/// Team document from the `teams` collection.
///
/// Team identity is the Firestore document id. Membership is treated as
/// a snapshot at aggregation time; add/remove flows live in the web app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Firestore document id
    #[serde(rename = "_firestore_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}
