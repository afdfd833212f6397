//! Vision service credentials and client settings, read from the environment.
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use visionary_vision::azure::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT};
use visionary_vision::{AzureVisionClient, VisionError};

pub const ENDPOINT_VAR: &str = "AZURE_ENDPOINT";
pub const KEY_VAR: &str = "AZURE_KEY";
pub const API_VERSION_VAR: &str = "AZURE_API_VERSION";
pub const TIMEOUT_VAR: &str = "VISIONARY_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VisionConfig {
    /// Read the configuration from the process environment. Call
    /// `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let endpoint = required(ENDPOINT_VAR)?.trim_end_matches('/').to_string();
        let api_key = required(KEY_VAR)?;

        let api_version = lookup(API_VERSION_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: TIMEOUT_VAR,
                        value,
                    })
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            api_key,
            api_version,
            timeout,
        })
    }

    pub fn build_client(&self) -> Result<AzureVisionClient, VisionError> {
        Ok(
            AzureVisionClient::with_timeout(&self.endpoint, &self.api_key, self.timeout)?
                .with_api_version(&self.api_version),
        )
    }
}
