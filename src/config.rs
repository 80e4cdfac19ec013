//! Application configuration loaded from environment variables.
//!
//! Everything the sync agent needs is read once at startup: the challenge
//! backend base URL, the participant's Facebook identity, and which
//! pedometer source (if any) the user has authorized.

use std::env;

use crate::providers::PedometerSource;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Challenge backend base URL
    pub server_url: String,
    /// Facebook identity of the participant this agent syncs for
    pub fbid: String,
    /// Pedometer source the user has authorized, if any.
    /// The core only ever reads this value.
    pub pedometer_source: Option<PedometerSource>,
    /// Path to the step sample log exported by the platform health store
    pub step_samples_path: String,
    /// Fitbit API access token (required only when the Fitbit source is authorized)
    pub fitbit_access_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            fbid: "test-fbid".to_string(),
            pedometer_source: Some(PedometerSource::HealthKit),
            step_samples_path: "data/step_samples.json".to_string(),
            fitbit_access_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let pedometer_source = match env::var("PEDOMETER_SOURCE") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<PedometerSource>()
                    .map_err(|_| ConfigError::Invalid("PEDOMETER_SOURCE", raw))?,
            ),
            _ => None,
        };

        Ok(Self {
            server_url: env::var("SERVER_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SERVER_URL"))?,
            fbid: env::var("FBID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FBID"))?,
            pedometer_source,
            step_samples_path: env::var("STEP_SAMPLES_PATH")
                .unwrap_or_else(|_| "data/step_samples.json".to_string()),
            fitbit_access_token: env::var("FITBIT_ACCESS_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
