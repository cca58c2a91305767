use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::oauth::SignConfig;

/// Complete courier configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub signer: SignerConfig,
}

impl CourierConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse courier config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Apply `COURIER_*` environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(v) = std::env::var("COURIER_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                self.transport.timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("COURIER_USER_AGENT") {
            if !v.is_empty() {
                self.transport.user_agent = v;
            }
        }
        if let Ok(v) = std::env::var("COURIER_OAUTH_SIGNER_URI") {
            if !v.is_empty() {
                self.signer.oauth_signer_uri = Some(v);
            }
        }
        self
    }
}

/// Settings for the underlying HTTP client
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Whole-request timeout in seconds; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("courier/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// OAuth1 signing service location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignerConfig {
    #[serde(default)]
    pub oauth_signer_uri: Option<String>,
}

impl SignerConfig {
    /// Signing credentials, when both a signer URI and a token are known.
    pub fn sign_config(&self, token: Option<Value>) -> Option<SignConfig> {
        match (&self.oauth_signer_uri, token) {
            (Some(uri), Some(token)) => Some(SignConfig {
                oauth_signer_uri: uri.clone(),
                token,
            }),
            _ => None,
        }
    }
}
