use chrono::{DateTime, Utc};

use super::api::{GitHubIssue, IssueSort};
use crate::Event;

/// Dedupe key for an issue: `{id}_{created_at|updated_at}`.
///
/// Keyed on the sort timestamp so every update yields a fresh key.
pub fn issue_key(issue: &GitHubIssue, sort: IssueSort) -> String {
    format!("{}_{}", issue.id, sort.timestamp(issue))
}

/// Transform a GitHub issue into an event.
pub fn issue_to_event(issue: &GitHubIssue, sort: IssueSort) -> Event {
    Event {
        id: issue_key(issue, sort),
        summary: format!("Issue {}: \"{}\"", sort.as_str(), issue.title),
        ts: parse_millis(sort.timestamp(issue)),
        payload: serde_json::to_value(issue).unwrap_or_default(),
    }
}

/// Epoch millis of an RFC 3339 timestamp; now when it does not parse.
fn parse_millis(timestamp: &str) -> i64 {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|ts| ts.timestamp_millis())
        .unwrap_or_else(|_| Utc::now().timestamp_millis())
}
