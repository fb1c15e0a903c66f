//! Fetcher configuration.
//!
//! Configuration is built once at startup and handed to the fetcher by
//! value. Only non-secret settings live here; credentials travel with each
//! call.
//!
//! # Environment Variables
//!
//! | Setting | Env Var |
//! |---------|---------|
//! | `base_url` | `CHAINFETCH_ORATS_BASE_URL` |
//! | `timeout_ms` | `CHAINFETCH_ORATS_TIMEOUT_MS` |

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ValidationError;

pub const ORATS_TICKERS_URL: &str = "https://api.orats.io/datav2/tickers";
pub const ORATS_CREDENTIAL_KEY: &str = "orats_api_key";

const BASE_URL_ENV: &str = "CHAINFETCH_ORATS_BASE_URL";
const TIMEOUT_ENV: &str = "CHAINFETCH_ORATS_TIMEOUT_MS";

/// How a fetcher's requests are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ExecutionMode {
    Sequential,
    Concurrent { max_in_flight: usize },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Concurrent { max_in_flight: 8 }
    }
}

/// Settings for the ORATS tickers fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OratsConfig {
    pub base_url: String,
    pub credential_key: String,
    pub timeout_ms: u64,
    pub execution: ExecutionMode,
}

impl Default for OratsConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(ORATS_TICKERS_URL),
            credential_key: String::from(ORATS_CREDENTIAL_KEY),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            execution: ExecutionMode::default(),
        }
    }
}

impl OratsConfig {
    /// Defaults overridden by the `CHAINFETCH_ORATS_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the
    /// `CHAINFETCH_ORATS_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ValidationError::InvalidConfig {
                    key: TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
            config = config.with_timeout_ms(timeout_ms);
        }

        Ok(config)
    }

    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(input)?;
        if config.timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                key: "timeout_ms",
                value: String::from("0"),
            }
            .into());
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_credential_key(mut self, credential_key: impl Into<String>) -> Self {
        self.credential_key = credential_key.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }
}
