use courier::SignConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An item emitted by a polling source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Dedupe key, unique per emitted state of the item
    pub id: String,

    /// Human-readable one-liner
    pub summary: String,

    /// Epoch milliseconds of the change that produced this event
    pub ts: i64,

    /// Raw item as returned by the external API
    pub payload: Value,
}

/// Credentials a connector authenticates with.
///
/// # Example
/// ```
/// use connectors::Credentials;
///
/// let credentials = Credentials::bearer("ghp_example");
/// assert!(credentials.sign_config.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    /// OAuth2 / API access token
    pub access_token: String,

    /// OAuth1 signing credentials for APIs that require signed requests
    pub sign_config: Option<SignConfig>,
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            sign_config: None,
        }
    }
}
