//! Query-string handling: pulling embedded queries out of URLs and encoding
//! `params` back onto the outgoing URL.

use super::{Fields, RequestConfig};
use crate::error::{Error, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Move a query string embedded in the URL into `params`.
///
/// Params already present win over URL-embedded values. The URL is rewritten
/// to its absolute form without the query.
pub fn extract_query(config: &mut RequestConfig) -> Result<()> {
    if config.url.is_empty() {
        return Ok(());
    }

    let full = config.resolved_url();
    let mut url = reqwest::Url::parse(&full)
        .map_err(|e| Error::Configuration(format!("invalid url `{}`: {}", full, e)))?;

    let query = match url.query() {
        Some(query) if !query.is_empty() => query.to_string(),
        _ => return Ok(()),
    };

    for (key, value) in parse_query(&query) {
        config
            .params
            .entry(key)
            .or_insert(Some(Value::String(value)));
    }

    url.set_query(None);
    config.url = url.to_string();
    Ok(())
}

/// Percent-decode `a=1&b=2` pairs. A repeated key keeps its last value.
fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Flatten params into string pairs.
///
/// Null and undefined values are skipped, arrays repeat the key as `key[]`,
/// objects are JSON-encoded.
pub fn param_pairs(params: &Fields) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                let key = format!("{}[]", key);
                for item in items {
                    if let Some(text) = stringify(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            Some(value) => {
                if let Some(text) = stringify(value) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Object(_) | Value::Array(_) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

/// Default query-string encoder.
pub fn serialize_params(params: &Fields) -> String {
    serde_urlencoded::to_string(param_pairs(params)).unwrap_or_default()
}

/// The URL the request is sent to: resolved URL plus encoded params.
pub fn build_url(config: &RequestConfig) -> String {
    let url = config.resolved_url();
    let query = match &config.params_serializer {
        Some(serializer) => serializer.serialize(&config.params),
        None => serialize_params(&config.params),
    };

    if query.is_empty() {
        url
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ParamsSerializer;
    use serde_json::json;

    #[test]
    fn test_extracts_embedded_query() {
        let mut config = RequestConfig::get("http://x/y?a=1&b=2");
        extract_query(&mut config).unwrap();

        assert_eq!(config.url, "http://x/y");
        assert_eq!(config.params.len(), 2);
        assert_eq!(config.params["a"], Some(json!("1")));
        assert_eq!(config.params["b"], Some(json!("2")));
    }

    #[test]
    fn test_explicit_params_win() {
        let mut config = RequestConfig::get("http://x/y?a=1&b=2").param("a", "override");
        extract_query(&mut config).unwrap();

        assert_eq!(config.params["a"], Some(json!("override")));
        assert_eq!(config.params["b"], Some(json!("2")));
    }

    #[test]
    fn test_percent_decodes_values() {
        let mut config = RequestConfig::get("http://x/search?q=hello%20world&tag=a%26b");
        extract_query(&mut config).unwrap();

        assert_eq!(config.params["q"], Some(json!("hello world")));
        assert_eq!(config.params["tag"], Some(json!("a&b")));
    }

    #[test]
    fn test_pair_without_value() {
        let mut config = RequestConfig::get("http://x/y?flag&a=1");
        extract_query(&mut config).unwrap();

        assert_eq!(config.params["flag"], Some(json!("")));
        assert_eq!(config.params["a"], Some(json!("1")));
    }

    #[test]
    fn test_uses_base_url() {
        let mut config = RequestConfig::get("/repos?per_page=10").base_url("https://api.example.com");
        extract_query(&mut config).unwrap();

        assert_eq!(config.url, "https://api.example.com/repos");
        assert_eq!(config.params["per_page"], Some(json!("10")));
    }

    #[test]
    fn test_without_query_is_untouched() {
        let mut config = RequestConfig::get("/repos").base_url("https://api.example.com");
        extract_query(&mut config).unwrap();

        assert_eq!(config.url, "/repos");
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let mut config = RequestConfig::get("not a url?a=1");
        let err = extract_query(&mut config).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_serialize_params_default_encoding() {
        let config = RequestConfig::get("http://x")
            .param("q", "a b")
            .param("ids", json!([1, 2]))
            .param("skip", Value::Null)
            .param("filter", json!({"k": "v"}));

        assert_eq!(
            serialize_params(&config.params),
            "filter=%7B%22k%22%3A%22v%22%7D&ids%5B%5D=1&ids%5B%5D=2&q=a+b"
        );
    }

    #[test]
    fn test_build_url_appends_params() {
        let config = RequestConfig::get("/y").base_url("http://x").param("a", 1);
        assert_eq!(build_url(&config), "http://x/y?a=1");

        let bare = RequestConfig::get("http://x/y");
        assert_eq!(build_url(&bare), "http://x/y");
    }

    #[test]
    fn test_build_url_uses_custom_serializer() {
        fn fixed(_: &Fields) -> String {
            "fixed=1".to_string()
        }
        let mut config = RequestConfig::get("http://x/y").param("a", 1);
        config.params_serializer = Some(ParamsSerializer(fixed));
        assert_eq!(build_url(&config), "http://x/y?fixed=1");
    }
}
