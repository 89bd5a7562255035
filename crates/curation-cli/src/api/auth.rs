//! OAuth access token resolution
//!
//! An explicit token (flag or `CURATION_ACCESS_TOKEN`) wins. Otherwise the
//! application-default credentials are asked for a token through gcloud.

use crate::config::Config;
use crate::error::{CliError, Result};
use tokio::process::Command;
use tracing::debug;

/// Return the configured token or mint one with gcloud
pub async fn resolve_access_token(config: &Config) -> Result<String> {
    if let Some(token) = &config.access_token {
        return Ok(token.clone());
    }

    debug!("No access token configured, asking gcloud for application-default credentials");

    let output = Command::new("gcloud")
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .await
        .map_err(|e| CliError::auth(format!("could not run gcloud: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::auth(format!("gcloud exited with {}: {}", output.status, stderr.trim())));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(CliError::auth("gcloud returned an empty access token"));
    }

    Ok(token)
}
