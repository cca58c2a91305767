//! Error types for request execution.
//!
//! Every failure surfaced by the executor is a [`Error`]. Callers that need to
//! branch on the failure class match on [`Error::kind`] instead of inspecting
//! messages.

use crate::response::ResponseEnvelope;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Message raised when a guarded body is asked for its `data` field.
pub const NONEXISTENT_DATA_MESSAGE: &str =
    "response body has no `data` property: the body is already unwrapped, read its fields directly";

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NonexistentDataProperty,
    Signing,
    Response,
    Transport,
    Json,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Caller misuse detected before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A guarded response body was asked for its `data` field.
    #[error("{}", NONEXISTENT_DATA_MESSAGE)]
    NonexistentDataProperty,

    /// The signing service call failed. Passed through as-is.
    #[error("OAuth1 signing request failed: {0}")]
    Signing(#[source] reqwest::Error),

    /// The request completed with a non-success response.
    #[error(transparent)]
    Response(Box<ResponseError>),

    /// The request failed without producing a response.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Encoding a request body or decoding a reply failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::NonexistentDataProperty => ErrorKind::NonexistentDataProperty,
            Error::Signing(_) => ErrorKind::Signing,
            Error::Response(_) => ErrorKind::Response,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// The response snapshot, for failures that produced one.
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Error::Response(err) => Some(&err.response),
            _ => None,
        }
    }
}

/// A request that failed with a response present.
///
/// `name` combines the original error name and message, `message` is the
/// serialized response body. The original transport error stays reachable
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{name}: {message}")]
pub struct ResponseError {
    pub name: String,
    pub message: String,
    pub response: ResponseEnvelope,
    #[source]
    pub source: reqwest::Error,
}

impl ResponseError {
    pub fn status(&self) -> u16 {
        self.response.status
    }
}
