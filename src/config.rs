//! Application configuration loaded from environment variables.
//!
//! Secrets (the trigger API key and the Google OAuth client secret) are
//! read once at startup; in production they are injected as env vars by
//! the hosting platform's secret bindings.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token required by all HTTP job triggers
    pub api_secret_key: String,
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Firebase/GCP project ID backing Firestore
    pub firebase_project_id: String,
    /// Server port
    pub port: u16,
    /// Hour of day (UTC) at which the daily scheduled run fires
    pub sync_hour_utc: u32,
    /// Whether the in-process daily scheduler runs at all
    pub scheduler_enabled: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_secret_key: "test_secret_key".to_string(),
            google_client_id: "test_client_id".to_string(),
            google_client_secret: "test_client_secret".to_string(),
            firebase_project_id: "test-project".to_string(),
            port: 3000,
            sync_hour_utc: 12,
            scheduler_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let sync_hour_utc: u32 = env::var("SYNC_HOUR_UTC")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SYNC_HOUR_UTC"))?;
        if sync_hour_utc > 23 {
            return Err(ConfigError::Invalid("SYNC_HOUR_UTC"));
        }

        Ok(Self {
            api_secret_key: env::var("API_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("API_SECRET_KEY"))?,
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            sync_hour_utc,
            scheduler_enabled: env::var("SCHEDULER_ENABLED")
                .map(|v| !matches!(v.trim(), "false" | "0"))
                .unwrap_or(true),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("API_SECRET_KEY", "super-secret");
        env::set_var("GOOGLE_CLIENT_ID", "test_id");
        env::set_var("GOOGLE_CLIENT_SECRET", "test_secret");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_secret_key, "super-secret");
        assert_eq!(config.google_client_id, "test_id");
        assert_eq!(config.port, 3000);
        assert_eq!(config.sync_hour_utc, 12);
        assert!(config.scheduler_enabled);
    }
}
