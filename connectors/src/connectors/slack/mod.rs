use anyhow::{anyhow, Context, Result};
use courier::{Instance, RequestConfig};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::Credentials;

pub const BASE_URL: &str = "https://slack.com/api";

/// Optional `chat.postMessage` arguments; unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrkdwn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_broadcast: Option<bool>,
    /// `full` or `none`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// Slack Web API actions over a persistent courier instance.
#[derive(Clone)]
pub struct SlackClient {
    http: Instance,
}

impl SlackClient {
    /// Create a client using the real Slack API base URL.
    pub fn new(credentials: &Credentials) -> Self {
        Self::with_base_url(credentials, BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with a mock server).
    pub fn with_base_url(credentials: &Credentials, base_url: impl Into<String>) -> Self {
        let defaults = RequestConfig::default()
            .base_url(base_url)
            .header("Authorization", format!("Bearer {}", credentials.access_token))
            .header("Content-Type", "application/json; charset=utf-8");
        Self {
            http: courier::create(defaults, credentials.sign_config.clone(), None),
        }
    }

    /// Add an emoji reaction to a message (`reactions.add`).
    pub async fn add_reaction(&self, channel: &str, timestamp: &str, name: &str) -> Result<Value> {
        self.call(
            "reactions.add",
            json!({ "channel": channel, "timestamp": timestamp, "name": name }),
        )
        .await
    }

    /// Post a message to a channel (`chat.postMessage`).
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<Value> {
        self.post_message_with(channel, text, &MessageOptions::default())
            .await
    }

    /// Post a reply in a message's thread.
    pub async fn post_reply(&self, channel: &str, thread_ts: &str, text: &str) -> Result<Value> {
        let options = MessageOptions {
            thread_ts: Some(thread_ts.to_string()),
            ..MessageOptions::default()
        };
        self.post_message_with(channel, text, &options).await
    }

    /// Post a message with formatting and threading options.
    pub async fn post_message_with(
        &self,
        channel: &str,
        text: &str,
        options: &MessageOptions,
    ) -> Result<Value> {
        let mut data = serde_json::to_value(options)?;
        if let Some(fields) = data.as_object_mut() {
            fields.insert("channel".to_string(), json!(channel));
            fields.insert("text".to_string(), json!(text));
        }
        self.call("chat.postMessage", data).await
    }

    /// Slack answers 200 with `ok: false` on API-level failures.
    async fn call(&self, method: &str, data: Value) -> Result<Value> {
        let reply = self
            .http
            .post(format!("/{}", method), data)
            .await
            .with_context(|| format!("Slack {} request failed", method))?;

        let body = reply.into_value();
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            warn!(method, code, "Slack API call rejected");
            return Err(anyhow!("Slack {} failed: {}", method, code));
        }
        Ok(body)
    }
}
