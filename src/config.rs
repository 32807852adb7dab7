//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::error::{config_error, RelayError};
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Mainnet NNS governance canister, used when no canister id is configured.
pub const DEFAULT_GOVERNANCE_CANISTER_ID: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";

/// Public boundary gateway for IC mainnet.
pub const DEFAULT_IC_HOST: &str = "https://ic0.app";

const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 15;

/// Gateway connection configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: Url,
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Per-call deadline for remote governance queries
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Governance target configuration
#[derive(Debug, Clone)]
pub struct GovernanceConfig {
    pub canister_id: String,
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub gateway: GatewayConfig,
    pub governance: GovernanceConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, RelayError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let raw_host = std::env::var("IC_HOST").unwrap_or_else(|_| DEFAULT_IC_HOST.to_string());
        let host = Url::parse(&raw_host)
            .map_err(|e| config_error(format!("Invalid IC_HOST '{}': {}", raw_host, e)))?;

        let request_timeout_secs = std::env::var("QUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);

        // A missing canister id is a warning, not a startup abort: fall back
        // to the mainnet NNS governance canister. A present but malformed
        // value is rejected.
        let canister_id = match std::env::var("GOVERNANCE_CANISTER_ID") {
            Ok(id) => {
                validate_canister_id(&id)?;
                id
            }
            Err(_) => {
                warn!(
                    "⚠️  GOVERNANCE_CANISTER_ID not set, falling back to mainnet NNS governance ({})",
                    DEFAULT_GOVERNANCE_CANISTER_ID
                );
                DEFAULT_GOVERNANCE_CANISTER_ID.to_string()
            }
        };

        Ok(Self {
            gateway: GatewayConfig {
                host,
                request_timeout_secs,
            },
            governance: GovernanceConfig { canister_id },
        })
    }
}

/// Validate the textual form of a canister principal.
///
/// Principals are dash-separated groups of lowercase base32 characters
/// (e.g. `rrkah-fqaaa-aaaaa-aaaaq-cai`).
fn validate_canister_id(id: &str) -> Result<(), RelayError> {
    if id.is_empty() {
        return Err(config_error("GOVERNANCE_CANISTER_ID is empty"));
    }
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || !id.contains('-') || id.starts_with('-') || id.ends_with('-') {
        return Err(config_error(format!(
            "Invalid GOVERNANCE_CANISTER_ID '{}' (expected a principal like '{}')",
            id, DEFAULT_GOVERNANCE_CANISTER_ID
        )));
    }
    Ok(())
}
