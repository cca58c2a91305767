//! Response handling: reading the transport response and shaping what the
//! caller gets back.

pub mod translate;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::warn;

pub use translate::translate;

/// Field name callers habitually reach for on an already-unwrapped body.
pub const RESERVED_FIELD: &str = "data";

/// Raw response: status, headers and parsed body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
}

impl ResponseEnvelope {
    /// Consume a transport response.
    pub async fn read(response: reqwest::Response) -> reqwest::Result<Self> {
        let mut envelope = Self::head(&response);
        let text = response.text().await?;
        envelope.data = parse_body(&text);
        Ok(envelope)
    }

    /// Consume a transport response, keeping status and headers when the
    /// body cannot be read. The body is then `""`.
    pub async fn read_lossy(response: reqwest::Response) -> Self {
        let mut envelope = Self::head(&response);
        match response.text().await {
            Ok(text) => envelope.data = parse_body(&text),
            Err(e) => warn!(status = envelope.status, error = %e, "Failed to read response body"),
        }
        envelope
    }

    fn head(response: &reqwest::Response) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else { continue };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        Self {
            status: response.status().as_u16(),
            headers,
            data: Value::String(String::new()),
        }
    }
}

/// JSON when the body parses as JSON, the raw text otherwise.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Response body that refuses reads of the reserved `data` field.
#[derive(Clone, Debug, PartialEq)]
pub struct GuardedBody(Value);

impl GuardedBody {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Read a top-level field. Reading `data` is an error.
    pub fn get(&self, field: &str) -> Result<Option<&Value>> {
        if field == RESERVED_FIELD {
            return Err(Error::NonexistentDataProperty);
        }
        Ok(self.0.get(field))
    }

    /// The underlying body, bypassing the guard.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// What a successful request returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// Status, headers and body, as requested with `returnFullResponse`.
    Full(ResponseEnvelope),
    /// Body that already nests a `data` object or array.
    Raw(Value),
    /// Any other body.
    Guarded(GuardedBody),
}

impl Reply {
    /// Read a top-level field of the body.
    ///
    /// For [`Reply::Full`] the reads go to the envelope's body.
    pub fn get(&self, field: &str) -> Result<Option<&Value>> {
        match self {
            Reply::Full(envelope) => Ok(envelope.data.get(field)),
            Reply::Raw(body) => Ok(body.get(field)),
            Reply::Guarded(body) => body.get(field),
        }
    }

    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Reply::Full(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Decode the body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let body = match self {
            Reply::Full(envelope) => envelope.data,
            Reply::Raw(body) => body,
            Reply::Guarded(body) => body.into_inner(),
        };
        Ok(serde_json::from_value(body)?)
    }

    /// Plain JSON view: the body, or `{status, headers, data}` for full replies.
    pub fn into_value(self) -> Value {
        match self {
            Reply::Full(envelope) => json!({
                "status": envelope.status,
                "headers": envelope.headers,
                "data": envelope.data,
            }),
            Reply::Raw(body) => body,
            Reply::Guarded(body) => body.into_inner(),
        }
    }
}

/// Shape a successful response for the caller.
pub fn guard(envelope: ResponseEnvelope, return_full_response: bool) -> Reply {
    if return_full_response {
        return Reply::Full(envelope);
    }
    if is_data_shaped(&envelope.data) {
        Reply::Raw(envelope.data)
    } else {
        Reply::Guarded(GuardedBody::new(envelope.data))
    }
}

/// A nested `data` counts only when it is an object or an array.
fn is_data_shaped(body: &Value) -> bool {
    matches!(
        body.get(RESERVED_FIELD),
        Some(Value::Object(_)) | Some(Value::Array(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;

    fn envelope(data: Value) -> ResponseEnvelope {
        ResponseEnvelope {
            status: 200,
            headers: BTreeMap::new(),
            data,
        }
    }

    #[test]
    fn test_full_response_untouched() {
        let reply = guard(envelope(json!({"foo": 1})), true);
        assert_eq!(reply, Reply::Full(envelope(json!({"foo": 1}))));
        assert_eq!(reply.envelope().unwrap().status, 200);
    }

    #[test]
    fn test_nested_data_returned_raw() {
        let reply = guard(envelope(json!({"data": {"foo": 1}})), false);
        assert_eq!(reply, Reply::Raw(json!({"data": {"foo": 1}})));
        assert_eq!(reply.get("data").unwrap(), Some(&json!({"foo": 1})));
        assert_eq!(reply.into_value(), json!({"data": {"foo": 1}}));
    }

    #[test]
    fn test_nested_data_array_returned_raw() {
        let reply = guard(envelope(json!({"data": [1, 2]})), false);
        assert!(matches!(reply, Reply::Raw(_)));
    }

    #[test]
    fn test_plain_body_is_guarded() {
        let reply = guard(envelope(json!({"foo": 1})), false);
        assert!(matches!(reply, Reply::Guarded(_)));
        assert_eq!(reply.get("foo").unwrap(), Some(&json!(1)));
        assert_eq!(reply.get("missing").unwrap(), None);

        let err = reply.get("data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonexistentDataProperty);
    }

    #[test]
    fn test_scalar_nested_data_is_guarded() {
        for nested in [json!(0), json!(""), json!(false), json!("text"), Value::Null] {
            let reply = guard(envelope(json!({"data": nested})), false);
            assert!(matches!(reply, Reply::Guarded(_)));
            assert!(reply.get("data").is_err());
        }
    }

    #[test]
    fn test_guarded_array_body() {
        let reply = guard(envelope(json!([{"id": 1}])), false);
        assert_eq!(reply.get("length").unwrap(), None);
        assert!(reply.get("data").is_err());
        assert_eq!(reply.into_value(), json!([{"id": 1}]));
    }

    #[test]
    fn test_into_json_decodes_body() {
        #[derive(Deserialize)]
        struct Item {
            id: u64,
        }

        let reply = guard(envelope(json!([{"id": 7}])), false);
        let items: Vec<Item> = reply.into_json().unwrap();
        assert_eq!(items[0].id, 7);

        let full = guard(envelope(json!({"id": 9})), true);
        let item: Item = full.into_json().unwrap();
        assert_eq!(item.id, 9);
    }

    #[test]
    fn test_into_json_reports_decode_errors() {
        let reply = guard(envelope(json!({"id": "nope"})), false);
        let err = reply.into_json::<Vec<u64>>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Json);
    }

    #[test]
    fn test_full_into_value() {
        let mut env = envelope(json!({"ok": true}));
        env.headers.insert("x-id".to_string(), "1".to_string());
        let value = guard(env, true).into_value();
        assert_eq!(value["status"], 200);
        assert_eq!(value["headers"]["x-id"], "1");
        assert_eq!(value["data"]["ok"], true);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body("plain text"), json!("plain text"));
        assert_eq!(parse_body(""), json!(""));
    }
}
