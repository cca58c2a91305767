use anyhow::{Context, Result};

pub const BASE_URL: &str = "https://api.github.com";
pub const ACCEPT: &str = "application/vnd.github+json";
pub const API_VERSION: &str = "2022-11-28";
pub const PER_PAGE: u64 = 100;

/// Settings for the "new or updated issue" source.
///
/// Loads from environment variables:
/// - `GITHUB_REPO` (`owner/name`, required)
/// - `GITHUB_EMIT_UPDATES` (optional; only `false` turns updates off)
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub repo_full_name: String,
    pub emit_updates: bool,
}

impl GitHubConfig {
    pub fn new(repo_full_name: impl Into<String>) -> Self {
        Self {
            repo_full_name: repo_full_name.into(),
            emit_updates: true,
        }
    }

    /// Load config from environment variables.
    pub fn from_env() -> Result<Self> {
        let repo_full_name = std::env::var("GITHUB_REPO").context("GITHUB_REPO not set")?;
        let emit_updates = std::env::var("GITHUB_EMIT_UPDATES")
            .map(|v| v != "false")
            .unwrap_or(true);
        Ok(Self {
            repo_full_name,
            emit_updates,
        })
    }
}
