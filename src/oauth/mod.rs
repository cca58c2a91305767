//! OAuth1 request signing through a remote signing service.
//!
//! The signature itself is computed elsewhere. This module builds the canonical
//! description of the request (method, URL with encoded params, and the body
//! when it is form-encoded), posts it with the caller's opaque token to the
//! signing service, and returns the `Authorization` value it answers with.

use crate::error::{Error, Result};
use crate::request::query::build_url;
use crate::request::{Fields, ParamsSerializer, Payload, RequestConfig, FORM_URLENCODED};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Where and with what credential a request gets signed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignConfig {
    pub oauth_signer_uri: String,
    /// Opaque credential forwarded to the signing service.
    pub token: Value,
}

/// The part of a request that gets signed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanonicalRequest {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignPayload<'a> {
    request_data: &'a CanonicalRequest,
    token: &'a Value,
}

/// Query-string encoder for signed requests.
///
/// Leaves only `A-Z a-z 0-9 - _ . ~` unescaped, so `! ' ( ) *` are
/// percent-encoded as OAuth1 canonicalization requires.
pub fn oauth1_params_serializer(params: &Fields) -> String {
    let mut parts = Vec::new();
    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            Some(Value::Array(items)) => {
                for item in items {
                    parts.push(format!("{}={}", key, urlencoding::encode(&primitive(item))));
                }
            }
            Some(value) => {
                parts.push(format!("{}={}", key, urlencoding::encode(&primitive(value))));
            }
            None => parts.push(format!("{}=", key)),
        }
    }
    parts.join("&")
}

pub const OAUTH1_PARAMS_SERIALIZER: ParamsSerializer = ParamsSerializer(oauth1_params_serializer);

fn primitive(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

/// Build the canonical request and install the OAuth1 encoder on `config`.
///
/// The body is included only for form-encoded mappings, or for string bodies
/// sent without a content type (or with the form content type). Everything
/// else is left out of the signature.
pub fn transform_config_for_oauth(config: &mut RequestConfig) -> CanonicalRequest {
    config.params_serializer = Some(OAUTH1_PARAMS_SERIALIZER);

    let content_type = config.content_type();
    let form_encoded = content_type == Some(FORM_URLENCODED);

    let data = match &config.data {
        Some(Payload::Text(text)) if content_type.is_none() || form_encoded => {
            Some(parse_form(text))
        }
        Some(payload) if form_encoded => payload
            .as_fields()
            .map(|_| payload.to_value()),
        _ => None,
    };

    CanonicalRequest {
        method: config.method.as_str().to_ascii_lowercase(),
        url: build_url(config),
        data,
    }
}

/// Parse `a=1&b=2` into an object. Repeated keys collect into arrays.
fn parse_form(text: &str) -> Value {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(text) {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!(error = %e, "Failed to parse form body for signing");
            Vec::new()
        }
    };

    let mut object = Map::new();
    for (key, value) in pairs {
        match object.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}

/// Obtain the `Authorization` value for `config` from the signing service.
///
/// Errors from the signing service are returned as [`Error::Signing`] without
/// further translation.
pub async fn sign(
    client: &reqwest::Client,
    config: &mut RequestConfig,
    sign_config: &SignConfig,
) -> Result<String> {
    let request_data = transform_config_for_oauth(config);

    debug!(
        signer = %sign_config.oauth_signer_uri,
        method = %request_data.method,
        url = %request_data.url,
        "Requesting OAuth1 signature"
    );

    let payload = SignPayload {
        request_data: &request_data,
        token: &sign_config.token,
    };

    let response = client
        .post(&sign_config.oauth_signer_uri)
        .json(&payload)
        .send()
        .await
        .map_err(Error::Signing)?
        .error_for_status()
        .map_err(Error::Signing)?;

    let body = response.text().await.map_err(Error::Signing)?;
    Ok(signature_from_body(body))
}

/// The signature is the body verbatim; a JSON string literal is unquoted.
fn signature_from_body(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::String(signature)) => signature,
        _ => body,
    }
}

/// Replace any `Authorization` header, whatever its casing.
pub fn set_authorization(config: &mut RequestConfig, signature: String) {
    config
        .headers
        .retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()));
    config
        .headers
        .insert("Authorization".to_string(), Some(signature));
}
