// SPDX-License-Identifier: MIT

//! Google Fit API client.
//!
//! Handles:
//! - Refresh-token exchange against the Google OAuth endpoint
//! - Bucketed aggregate queries (steps, calories)
//! - Revoked-consent detection (invalid_grant), which the sync job
//!   turns into a permanent local disconnect

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const STEPS_DATA_TYPE: &str = "com.google.step_count.delta";
const STEPS_DATA_SOURCE: &str =
    "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps";
const CALORIES_DATA_TYPE: &str = "com.google.calories.expended";
const CALORIES_DATA_SOURCE: &str =
    "derived:com.google.calories.expended:com.google.android.gms:from_activities";

/// 24-hour aggregation buckets.
const DAY_BUCKET_MILLIS: i64 = 86_400_000;

/// Google Fit API client.
#[derive(Clone)]
pub struct GoogleFitClient {
    http: reqwest::Client,
    token_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
}

impl GoogleFitClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_base_url: "https://www.googleapis.com/fitness/v1".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange a stored refresh token for a short-lived access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleFit(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if is_revoked_response(status.as_u16(), &body) {
                return Err(AppError::GoogleFit(AppError::FIT_TOKEN_REVOKED.to_string()));
            }
            return Err(AppError::GoogleFit(format!("HTTP {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::GoogleFit(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Run a bucketed aggregate query against the Fitness API.
    pub async fn aggregate(
        &self,
        access_token: &str,
        request: &AggregateRequest,
    ) -> Result<AggregateResponse, AppError> {
        let url = format!("{}/users/me/dataset:aggregate", self.api_base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::GoogleFit(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // A 401 here means the grant died between token exchange and use
            if is_revoked_response(status.as_u16(), &body) {
                return Err(AppError::GoogleFit(AppError::FIT_TOKEN_REVOKED.to_string()));
            }
            return Err(AppError::GoogleFit(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleFit(format!("JSON parse error: {}", e)))
    }
}

/// Whether an error response indicates revoked/withdrawn consent rather
/// than a transient failure.
pub(crate) fn is_revoked_response(status: u16, body: &str) -> bool {
    status == 401 || ((status == 400 || status == 403) && body.contains("invalid_grant"))
}

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ─── Aggregate Request ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    aggregate_by: Vec<AggregateBy>,
    bucket_by_time: BucketByTime,
    start_time_millis: i64,
    end_time_millis: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateBy {
    data_type_name: String,
    data_source_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketByTime {
    duration_millis: i64,
}

impl AggregateRequest {
    /// Step-count deltas in 24-hour buckets over `[start, end]` millis.
    pub fn steps(start_time_millis: i64, end_time_millis: i64) -> Self {
        Self::for_source(
            STEPS_DATA_TYPE,
            STEPS_DATA_SOURCE,
            start_time_millis,
            end_time_millis,
        )
    }

    /// Calorie expenditure in 24-hour buckets over `[start, end]` millis.
    pub fn calories(start_time_millis: i64, end_time_millis: i64) -> Self {
        Self::for_source(
            CALORIES_DATA_TYPE,
            CALORIES_DATA_SOURCE,
            start_time_millis,
            end_time_millis,
        )
    }

    fn for_source(
        data_type_name: &str,
        data_source_id: &str,
        start_time_millis: i64,
        end_time_millis: i64,
    ) -> Self {
        Self {
            aggregate_by: vec![AggregateBy {
                data_type_name: data_type_name.to_string(),
                data_source_id: data_source_id.to_string(),
            }],
            bucket_by_time: BucketByTime {
                duration_millis: DAY_BUCKET_MILLIS,
            },
            start_time_millis,
            end_time_millis,
        }
    }
}

// ─── Aggregate Response ──────────────────────────────────────────

/// Aggregate response; all levels defaulted so sparse JSON parses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    #[serde(default)]
    pub bucket: Vec<AggregateBucket>,
}

/// One 24-hour bucket. `startTimeMillis` arrives as a string (int64 in
/// Google's JSON encoding).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub start_time_millis: String,
    #[serde(default)]
    pub dataset: Vec<AggregateDataset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDataset {
    #[serde(default)]
    pub point: Vec<AggregateDataPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDataPoint {
    #[serde(default)]
    pub value: Vec<PointValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointValue {
    pub int_val: Option<i64>,
    pub fp_val: Option<f64>,
}

impl AggregateBucket {
    /// UTC calendar date of the bucket, truncated from `startTimeMillis`.
    pub fn date(&self) -> Option<NaiveDate> {
        let millis: i64 = self.start_time_millis.parse().ok()?;
        Some(chrono::DateTime::from_timestamp_millis(millis)?.date_naive())
    }

    /// Sum of all `intVal` point values across all datasets.
    pub fn total_steps(&self) -> i64 {
        self.dataset
            .iter()
            .flat_map(|d| &d.point)
            .flat_map(|p| &p.value)
            .filter_map(|v| v.int_val)
            .sum()
    }

    /// Sum of all `fpVal` point values across all datasets.
    pub fn total_calories(&self) -> f64 {
        self.dataset
            .iter()
            .flat_map(|d| &d.point)
            .flat_map(|p| &p.value)
            .filter_map(|v| v.fp_val)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Midnight UTC, 2024-03-04
    const DAY_START_MILLIS: i64 = 1_709_510_400_000;

    fn steps_bucket_json() -> serde_json::Value {
        serde_json::json!({
            "bucket": [{
                "startTimeMillis": DAY_START_MILLIS.to_string(),
                "endTimeMillis": (DAY_START_MILLIS + 86_400_000).to_string(),
                "dataset": [{
                    "dataSourceId": "derived:com.google.step_count.delta:aggregated",
                    "point": [
                        { "value": [{ "intVal": 3000 }] },
                        { "value": [{ "intVal": 2000 }] }
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_bucket_date_truncates_to_utc_day() {
        let response: AggregateResponse =
            serde_json::from_value(steps_bucket_json()).expect("response should parse");
        let bucket = &response.bucket[0];

        assert_eq!(
            bucket.date(),
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_mid_day_start_truncates_to_same_day() {
        let bucket = AggregateBucket {
            start_time_millis: (DAY_START_MILLIS + 5 * 3_600_000).to_string(),
            dataset: vec![],
        };
        assert_eq!(
            bucket.date(),
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_unparseable_start_time() {
        let bucket = AggregateBucket {
            start_time_millis: "not-a-number".to_string(),
            dataset: vec![],
        };
        assert_eq!(bucket.date(), None);
    }

    #[test]
    fn test_total_steps_sums_all_points() {
        let response: AggregateResponse =
            serde_json::from_value(steps_bucket_json()).expect("response should parse");
        assert_eq!(response.bucket[0].total_steps(), 5000);
    }

    #[test]
    fn test_sparse_response_defaults() {
        // Buckets with no datasets, points, or values still parse
        let response: AggregateResponse = serde_json::from_value(serde_json::json!({
            "bucket": [
                { "startTimeMillis": "0" },
                { "startTimeMillis": "0", "dataset": [{ "point": [{}] }] }
            ]
        }))
        .expect("sparse response should parse");

        assert_eq!(response.bucket[0].total_steps(), 0);
        assert_eq!(response.bucket[1].total_calories(), 0.0);

        let empty: AggregateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.bucket.is_empty());
    }

    #[test]
    fn test_total_calories_sums_fp_values() {
        let response: AggregateResponse = serde_json::from_value(serde_json::json!({
            "bucket": [{
                "startTimeMillis": DAY_START_MILLIS.to_string(),
                "dataset": [{
                    "point": [
                        { "value": [{ "fpVal": 120.5 }] },
                        { "value": [{ "fpVal": 179.5 }, { "intVal": 7 }] }
                    ]
                }]
            }]
        }))
        .unwrap();

        let bucket = &response.bucket[0];
        assert_eq!(bucket.total_calories(), 300.0);
        // intVal points do not leak into the calorie sum
        assert_eq!(bucket.total_steps(), 7);
    }

    #[test]
    fn test_revoked_response_classification() {
        assert!(is_revoked_response(401, ""));
        assert!(is_revoked_response(
            400,
            r#"{"error": "invalid_grant", "error_description": "Token has been expired or revoked."}"#
        ));
        assert!(is_revoked_response(403, r#"{"error": "invalid_grant"}"#));
        assert!(!is_revoked_response(400, r#"{"error": "invalid_request"}"#));
        assert!(!is_revoked_response(429, "rate limited"));
        assert!(!is_revoked_response(500, "server error"));
    }

    #[test]
    fn test_aggregate_request_wire_shape() {
        let request = AggregateRequest::steps(1000, 2000);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["aggregateBy"][0]["dataTypeName"],
            "com.google.step_count.delta"
        );
        assert_eq!(
            json["aggregateBy"][0]["dataSourceId"],
            "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps"
        );
        assert_eq!(json["bucketByTime"]["durationMillis"], 86_400_000);
        assert_eq!(json["startTimeMillis"], 1000);
        assert_eq!(json["endTimeMillis"], 2000);
    }
}
