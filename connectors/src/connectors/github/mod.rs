pub mod api;
pub mod config;
pub mod transformer;

use crate::{Connector, Credentials, Event};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

use self::api::{GitHubClient, IssueSort};
use self::config::{GitHubConfig, BASE_URL};
use self::transformer::{issue_key, issue_to_event};

/// GitHub "new or updated issue" source.
///
/// Lists the repository's latest issues on every poll and emits the ones it
/// has not seen. The first poll only records what already exists.
pub struct GitHubConnector {
    base_url: String,
    config: GitHubConfig,
    seen: Mutex<HashSet<String>>,
}

impl GitHubConnector {
    /// Create a connector using the real GitHub API base URL.
    pub fn new(config: GitHubConfig) -> Self {
        Self::with_base_url(config, BASE_URL.to_string())
    }

    /// Create a connector with a custom API base URL (for testing).
    pub fn with_base_url(config: GitHubConfig, base_url: String) -> Self {
        Self {
            base_url,
            config,
            seen: Mutex::new(HashSet::new()),
        }
    }

    fn sort(&self) -> IssueSort {
        if self.config.emit_updates {
            IssueSort::Updated
        } else {
            IssueSort::Created
        }
    }
}

#[async_trait]
impl Connector for GitHubConnector {
    fn name(&self) -> &str {
        "github"
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<Event>> {
        let sort = self.sort();
        let client = GitHubClient::with_base_url(credentials, self.base_url.clone());
        let issues = client
            .latest_issues(&self.config.repo_full_name, sort)
            .await?;

        let mut seen = self
            .seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let should_emit = !seen.is_empty();

        let mut events = Vec::new();
        for issue in &issues {
            if seen.insert(issue_key(issue, sort)) && should_emit {
                events.push(issue_to_event(issue, sort));
            }
        }

        debug!(
            repo = %self.config.repo_full_name,
            listed = issues.len(),
            emitted = events.len(),
            "GitHub issues polled"
        );
        Ok(events)
    }

    fn poll_interval(&self) -> u64 {
        300 // 5 minutes
    }
}
