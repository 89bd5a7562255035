//! Configuration management for the curation CLI
//!
//! Holds remote endpoints, credentials and timing settings. Values come from
//! the environment (optionally seeded from a `.env` file) and may be
//! overridden by command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Google Genomics v1 REST endpoint.
pub const DEFAULT_GENOMICS_URL: &str = "https://genomics.googleapis.com/v1";

/// BigQuery v2 REST endpoint.
pub const DEFAULT_BIGQUERY_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Cloud Storage JSON API endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com/storage/v1";

/// Default timeout for a single API request in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 300;

/// Default wait between operation status queries in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Genomics API base URL
    pub genomics_url: String,

    /// BigQuery API base URL
    pub bigquery_url: String,

    /// Cloud Storage API base URL
    pub storage_url: String,

    /// OAuth access token; resolved through gcloud when absent
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds
    pub api_timeout_secs: u64,

    /// Seconds between operation status queries
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genomics_url: DEFAULT_GENOMICS_URL.to_string(),
            bigquery_url: DEFAULT_BIGQUERY_URL.to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            access_token: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load config from environment variables
    ///
    /// - `CURATION_GENOMICS_URL`, `CURATION_BIGQUERY_URL`, `CURATION_STORAGE_URL`
    /// - `CURATION_ACCESS_TOKEN`
    /// - `CURATION_API_TIMEOUT_SECS`
    /// - `CURATION_POLL_INTERVAL_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("CURATION_GENOMICS_URL") {
            config.genomics_url = url;
        }

        if let Ok(url) = std::env::var("CURATION_BIGQUERY_URL") {
            config.bigquery_url = url;
        }

        if let Ok(url) = std::env::var("CURATION_STORAGE_URL") {
            config.storage_url = url;
        }

        if let Ok(token) = std::env::var("CURATION_ACCESS_TOKEN") {
            if !token.trim().is_empty() {
                config.access_token = Some(token.trim().to_string());
            }
        }

        if let Ok(secs) = std::env::var("CURATION_API_TIMEOUT_SECS") {
            config.api_timeout_secs = parse_secs("CURATION_API_TIMEOUT_SECS", &secs)?;
        }

        if let Ok(secs) = std::env::var("CURATION_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = parse_secs("CURATION_POLL_INTERVAL_SECS", &secs)?;
        }

        Ok(config)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Apply command-line overrides
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.access_token = token;
        }
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.poll_interval_secs = secs;
        }
        self
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::config(format!("{} must be a whole number of seconds, got '{}'", name, value)))
}
