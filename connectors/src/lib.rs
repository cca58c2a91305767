//! Connectors - per-service integrations built on the courier execution layer.
//!
//! A connector polls an external API (or performs an action against it) by
//! describing each call as a [`courier::RequestConfig`]. Signing, query
//! handling, error translation and reply shaping all live in courier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Connector (implements trait)       │
//! │  - build request configs                 │
//! │  - dedupe what was already seen          │
//! │  - shape events                          │
//! └─────────────────────────────────────────┘
//!          ↓  RequestConfig (+ SignConfig)
//!   courier::Instance
//!          ↓
//! External API (GitHub, Slack, ...)
//! ```
//!
//! # Core Types
//!
//! - [`Connector`] - Trait that all polling sources implement
//! - [`Credentials`] - Access token and optional OAuth1 signing credentials
//! - [`Event`] - What a source emits for each new item
//!
//! # Creating a Connector
//!
//! ```no_run
//! use connectors::{Connector, Credentials, Event};
//! use async_trait::async_trait;
//! use anyhow::Result;
//!
//! struct MyConnector;
//!
//! #[async_trait]
//! impl Connector for MyConnector {
//!     fn name(&self) -> &str {
//!         "myservice"
//!     }
//!
//!     async fn fetch(&self, credentials: &Credentials) -> Result<Vec<Event>> {
//!         // 1. Build a courier instance from credentials
//!         // 2. Fetch items from the external API
//!         // 3. Return events for items not seen before
//!         Ok(vec![])
//!     }
//!
//!     fn poll_interval(&self) -> u64 {
//!         300 // 5 minutes
//!     }
//! }
//! ```

mod connector;
mod types;
pub mod connectors;

pub use connector::Connector;
pub use types::{Credentials, Event};
