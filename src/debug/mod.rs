//! Debug exports.
//!
//! When a request has `debug` set, the executor hands snapshots of the outgoing
//! config, the response body, or the failed response to an [`ExportSink`]
//! under fixed keys. Without a sink the snapshot is logged instead.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

/// Key for the outgoing request config.
pub const DEBUG_CONFIG: &str = "debug_config";
/// Key for the response body of a successful request.
pub const DEBUG_RESPONSE: &str = "debug_response";
/// Key for the response of a failed request.
pub const DEBUG_ERROR: &str = "debug";

/// Destination for debug snapshots.
pub trait ExportSink: Send + Sync {
    fn export(&self, key: &str, value: Value);
}

/// Key/value sink. A later export under the same key replaces the earlier one.
#[derive(Debug, Default)]
pub struct Exports {
    values: RwLock<BTreeMap<String, Value>>,
}

impl Exports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl ExportSink for Exports {
    fn export(&self, key: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// Snapshot `value` and hand it to `sink`, or log it when there is no sink.
///
/// A value that cannot be snapshotted is logged and skipped.
pub fn export<T: Serialize + ?Sized>(sink: Option<&dyn ExportSink>, key: &str, value: &T) {
    let snapshot = match serde_json::to_value(value) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(key, error = %e, "Failed to snapshot debug export");
            return;
        }
    };

    match sink {
        Some(sink) => sink.export(key, snapshot),
        None => {
            let rendered =
                serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| snapshot.to_string());
            info!("export: {} - {}", key, rendered);
        }
    }
}
