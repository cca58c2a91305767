use crate::{Credentials, Event};
use anyhow::Result;
use async_trait::async_trait;

/// Polling source interface for external API integrations.
///
/// A connector owns its dedupe state; credentials are handed in on every
/// poll so a token refresh never requires rebuilding the connector.
///
/// # Lifecycle
/// 1. The caller builds the connector with its per-source settings
/// 2. The caller invokes `fetch(credentials)` every `poll_interval()` seconds
/// 3. The connector returns events for items it has not seen before
///
/// # Example
/// ```no_run
/// use connectors::{Connector, Credentials, Event};
/// use async_trait::async_trait;
/// use anyhow::Result;
///
/// struct StatusConnector;
///
/// #[async_trait]
/// impl Connector for StatusConnector {
///     fn name(&self) -> &str {
///         "status"
///     }
///
///     async fn fetch(&self, credentials: &Credentials) -> Result<Vec<Event>> {
///         Ok(vec![])
///     }
///
///     fn poll_interval(&self) -> u64 {
///         60
///     }
/// }
/// ```
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the unique identifier for this connector.
    ///
    /// Must be lowercase alphanumeric (e.g., "github", "slack").
    fn name(&self) -> &str;

    /// Fetches new items from the external API and returns them as events.
    ///
    /// # Returns
    /// * `Ok(Vec<Event>)` - Events for items not emitted before (may be empty)
    /// * `Err(...)` - Authentication, network, or API errors
    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<Event>>;

    /// Returns the poll interval in seconds.
    ///
    /// Consider API rate limits when setting this value.
    fn poll_interval(&self) -> u64;
}
