//! Courier - shared outbound request execution for integration connectors.
//!
//! Connectors describe a call as a [`RequestConfig`]; courier sanitizes it,
//! moves any embedded query string into `params`, optionally obtains an OAuth1
//! `Authorization` header from a remote signing service, sends it, and shapes
//! the result.
//!
//! # Architecture
//!
//! ```text
//! Connector (GitHub, Slack, ...)
//!          ↓  RequestConfig (+ SignConfig)
//! ┌─────────────────────────────────────────┐
//! │       Executor / Instance                │
//! │  - sanitize, extract query               │
//! │  - OAuth1 signing (remote signer)        │
//! │  - dispatch over reqwest                 │
//! │  - guard replies, translate failures     │
//! │  - debug exports to an ExportSink        │
//! └─────────────────────────────────────────┘
//!          ↓
//!   Reply::{Full, Raw, Guarded}  or  Error
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use courier::{Executor, RequestConfig};
//!
//! # async fn run() -> courier::Result<()> {
//! let executor = Executor::new();
//! let reply = executor
//!     .execute(None, RequestConfig::get("https://api.example.com/items?page=2"), None)
//!     .await?;
//! println!("{:?}", reply.get("items")?);
//! # Ok(())
//! # }
//! ```

// Ambient configuration (TOML + env)
pub mod config;

// Debug export sinks
pub mod debug;

// Error taxonomy
pub mod error;

// Pipeline orchestration
pub mod executor;

// OAuth1 signing
pub mod oauth;

// Request model, sanitizing, query handling
pub mod request;

// Reply shaping and error translation
pub mod response;

pub use config::{CourierConfig, TransportConfig};
pub use debug::{ExportSink, Exports};
pub use error::{Error, ErrorKind, ResponseError, Result};
pub use executor::{create, execute, Executor, Instance};
pub use oauth::{transform_config_for_oauth, CanonicalRequest, SignConfig};
pub use request::{Fields, Headers, ParamsSerializer, Payload, RequestConfig};
pub use response::{GuardedBody, Reply, ResponseEnvelope};
