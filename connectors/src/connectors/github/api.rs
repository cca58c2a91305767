use anyhow::{anyhow, Result};
use courier::{Instance, RequestConfig};
use serde::{Deserialize, Serialize};

use super::config::{ACCEPT, API_VERSION, BASE_URL, PER_PAGE};
use crate::Credentials;

const USER_AGENT: &str = "courier-connectors/0.1";

/// Author of a GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueUser {
    pub login: String,
}

/// GitHub issue (pull requests are listed as issues too).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: IssueUser,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

/// Ordering for the latest-issues listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    Created,
    Updated,
}

impl IssueSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
        }
    }

    /// Timestamp of the issue field this ordering is keyed on.
    pub fn timestamp<'a>(&self, issue: &'a GitHubIssue) -> &'a str {
        match self {
            IssueSort::Created => &issue.created_at,
            IssueSort::Updated => &issue.updated_at,
        }
    }
}

/// GitHub REST API client over a persistent courier instance.
///
/// Every call carries the Bearer token, the GitHub media type, the API
/// version and a User-Agent header.
#[derive(Clone)]
pub struct GitHubClient {
    http: Instance,
}

impl GitHubClient {
    /// Create a client using the default GitHub API base URL.
    pub fn new(credentials: &Credentials) -> Self {
        Self::with_base_url(credentials, BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with a mock server).
    pub fn with_base_url(credentials: &Credentials, base_url: impl Into<String>) -> Self {
        let defaults = RequestConfig::default()
            .base_url(base_url)
            .header("Authorization", format!("Bearer {}", credentials.access_token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT);
        Self {
            http: courier::create(defaults, credentials.sign_config.clone(), None),
        }
    }

    /// Fetch a repository's most recently created or updated issues.
    pub async fn latest_issues(
        &self,
        repo_full_name: &str,
        sort: IssueSort,
    ) -> Result<Vec<GitHubIssue>> {
        let config = RequestConfig::get(format!(
            "/repos/{}/issues?state=all&direction=desc",
            repo_full_name
        ))
        .param("sort", sort.as_str())
        .param("per_page", PER_PAGE);

        let reply = self.http.request(config).await.map_err(describe_error)?;
        reply
            .into_json::<Vec<GitHubIssue>>()
            .map_err(|e| anyhow::Error::new(e).context("Failed to parse issues response"))
    }
}

/// Map known GitHub failures to descriptive errors.
///
/// - 401 → auth error (token expired or invalid)
/// - 403 → rate limit (reports X-RateLimit-Remaining)
/// - Other non-2xx → generic API error
/// - No response at all → the transport error with context
fn describe_error(err: courier::Error) -> anyhow::Error {
    let failure = err.response().map(|response| {
        let remaining = response
            .headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        (response.status, remaining)
    });

    match failure {
        Some((401, _)) => anyhow!("GitHub auth error: token expired or invalid"),
        Some((403, remaining)) => anyhow!(
            "GitHub rate limit exceeded (X-RateLimit-Remaining: {})",
            remaining
        ),
        Some((status, _)) => anyhow!("GitHub API error: {}", status),
        None => anyhow::Error::new(err).context("Failed to send latest_issues request"),
    }
}
