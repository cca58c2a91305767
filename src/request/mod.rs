//! Request configuration model.
//!
//! A [`RequestConfig`] is what connectors hand to the executor. It mirrors the
//! JSON shape connectors already speak (`baseURL`, `returnFullResponse`, ...)
//! so configs can be loaded from files or built in code.
//!
//! "Undefined" entries are `None` values inside [`Fields`] and [`Headers`].
//! They can only be created programmatically: JSON input always yields present
//! values, a JSON `null` included.

pub mod query;
pub mod sanitize;

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub use query::extract_query;
pub use sanitize::sanitize;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";

/// Params or mapping body entries; `None` marks an undefined value.
pub type Fields = BTreeMap<String, Option<Value>>;

/// Header entries; `None` marks an undefined value.
pub type Headers = BTreeMap<String, Option<String>>;

/// Custom query-string encoder for `params`.
#[derive(Clone, Copy)]
pub struct ParamsSerializer(pub fn(&Fields) -> String);

impl ParamsSerializer {
    pub fn serialize(&self, params: &Fields) -> String {
        (self.0)(params)
    }
}

impl fmt::Debug for ParamsSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParamsSerializer(..)")
    }
}

/// Request body (`data`).
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Key/value body; sanitized like params.
    Map(Fields),
    /// Raw string body, sent verbatim.
    Text(String),
    /// Any other JSON body (arrays, numbers, ...).
    Json(Value),
}

impl Payload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Payload::Map(map.into_iter().map(|(k, v)| (k, Some(v))).collect()),
            Value::String(text) => Payload::Text(text),
            other => Payload::Json(other),
        }
    }

    /// JSON view of the payload. Undefined map entries are dropped.
    pub fn to_value(&self) -> Value {
        match self {
            Payload::Map(fields) => Value::Object(
                fields
                    .iter()
                    .filter_map(|(k, v)| v.clone().map(|v| (k.clone(), v)))
                    .collect(),
            ),
            Payload::Text(text) => Value::String(text.clone()),
            Payload::Json(value) => value.clone(),
        }
    }

    /// Key/value view for mapping-shaped payloads.
    pub fn as_fields(&self) -> Option<Fields> {
        match self {
            Payload::Map(fields) => Some(fields.clone()),
            Payload::Json(Value::Object(map)) => Some(
                map.iter()
                    .map(|(k, v)| (k.clone(), Some(v.clone())))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Payload::from_value)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::from_value(value)
    }
}

/// Configuration for a single outbound request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    #[serde(default, with = "method_serde")]
    pub method: Method,

    #[serde(default)]
    pub url: String,

    #[serde(default, rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_entries",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub headers: Headers,

    #[serde(
        default,
        deserialize_with = "present_entries",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub params: Fields,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,

    /// Reserved. A config carrying `body` is always rejected; use `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Query-string encoder; the default encoder is used when unset.
    #[serde(skip)]
    pub params_serializer: Option<ParamsSerializer>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub return_full_response: bool,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Some(value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), Some(value.into()));
        self
    }

    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn full_response(mut self, return_full_response: bool) -> Self {
        self.return_full_response = return_full_response;
        self
    }

    /// Value of the first `content-type` header, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, value)| value.as_deref())
    }

    /// `url` if absolute, otherwise `baseURL` and `url` joined by a single slash.
    pub fn resolved_url(&self) -> String {
        match &self.base_url {
            Some(base) if reqwest::Url::parse(&self.url).is_err() => {
                if self.url.is_empty() {
                    base.clone()
                } else {
                    format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        self.url.trim_start_matches('/')
                    )
                }
            }
            _ => self.url.clone(),
        }
    }
}

fn present_entries<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, Option<V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let entries = BTreeMap::<String, V>::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|(k, v)| (k, Some(v))).collect())
}

mod method_serde {
    use reqwest::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&method.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).map_err(serde::de::Error::custom)
    }
}
