use super::{Payload, RequestConfig};
use std::collections::BTreeMap;

/// Drop undefined entries from a map. Top level only.
pub fn clean_entries<V>(entries: &mut BTreeMap<String, Option<V>>) {
    entries.retain(|_, value| value.is_some());
}

/// Remove undefined headers, params and mapping body entries.
///
/// Non-mapping bodies are left untouched.
pub fn sanitize(config: &mut RequestConfig) {
    clean_entries(&mut config.headers);
    clean_entries(&mut config.params);
    if let Some(Payload::Map(fields)) = &mut config.data {
        clean_entries(fields);
    }
}
