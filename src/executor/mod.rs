//! Request execution pipeline.
//!
//! ```text
//!   RequestConfig (+ SignConfig)
//!          ↓
//!   reject `body` → sanitize → extract query → sign (optional)
//!          ↓
//!   dispatch ── debug_config
//!          ↓
//!   2xx → guard ── debug_response        non-2xx → translate ── debug
//! ```
//!
//! [`Executor::execute`] runs the pipeline once. [`Executor::create`] binds a
//! base config, signing credentials and an export sink into an [`Instance`]
//! that runs the same pipeline for every call.

mod instance;


pub use instance::Instance;

use crate::config::TransportConfig;
use crate::debug::{self, ExportSink, DEBUG_CONFIG, DEBUG_ERROR, DEBUG_RESPONSE};
use crate::error::{Error, Result};
use crate::oauth::{self, SignConfig};
use crate::request::query::{build_url, param_pairs};
use crate::request::{
    extract_query, sanitize, Payload, RequestConfig, APPLICATION_JSON, FORM_URLENCODED,
};
use crate::response::{guard, translate, Reply, ResponseEnvelope};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes request configs over a shared `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct Executor {
    client: reqwest::Client,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the underlying client from transport settings.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::Transport)?;
        Ok(Self::with_client(client))
    }

    /// Run one request through the full pipeline.
    ///
    /// A config carrying `body` is rejected before any network call.
    pub async fn execute(
        &self,
        sink: Option<&dyn ExportSink>,
        config: RequestConfig,
        sign_config: Option<&SignConfig>,
    ) -> Result<Reply> {
        let config = self.prepare(config, sign_config).await?;
        self.dispatch(sink, config).await
    }

    /// Bind base settings into a reusable [`Instance`].
    pub fn create(
        &self,
        defaults: RequestConfig,
        sign_config: Option<SignConfig>,
        sink: Option<Arc<dyn ExportSink>>,
    ) -> Instance {
        Instance::new(self.clone(), defaults, sign_config, sink)
    }

    /// Pre-request steps: validate, sanitize, extract the query, sign.
    async fn prepare(
        &self,
        mut config: RequestConfig,
        sign_config: Option<&SignConfig>,
    ) -> Result<RequestConfig> {
        if config.body.is_some() {
            return Err(Error::Configuration(
                "unexpected body, use only data instead".to_string(),
            ));
        }

        sanitize(&mut config);
        extract_query(&mut config)?;

        if let Some(sign_config) = sign_config {
            let signature = oauth::sign(&self.client, &mut config, sign_config).await?;
            oauth::set_authorization(&mut config, signature);
        }

        Ok(config)
    }

    /// Send the prepared request and shape the outcome.
    async fn dispatch(&self, sink: Option<&dyn ExportSink>, config: RequestConfig) -> Result<Reply> {
        if config.debug {
            debug::export(sink, DEBUG_CONFIG, &config);
        }

        let request = build_request(&self.client, &config)?;
        debug!(method = %request.method(), url = %request.url(), "Dispatching request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(Error::Transport)?;
        let Some(source) = response.error_for_status_ref().err() else {
            let envelope = ResponseEnvelope::read(response)
                .await
                .map_err(Error::Transport)?;
            if config.debug {
                debug::export(sink, DEBUG_RESPONSE, &envelope.data);
            }
            return Ok(guard(envelope, config.return_full_response));
        };

        // A failed response stays inspectable even when its body is lost
        let envelope = ResponseEnvelope::read_lossy(response).await;
        warn!(status = envelope.status, "Request failed");
        if config.debug {
            debug::export(sink, DEBUG_ERROR, &envelope);
        }
        Err(translate(source, envelope))
    }
}

/// One-shot execution with a default client.
pub async fn execute(
    sink: Option<&dyn ExportSink>,
    config: RequestConfig,
    sign_config: Option<&SignConfig>,
) -> Result<Reply> {
    Executor::new().execute(sink, config, sign_config).await
}

/// Instance with a default client.
pub fn create(
    defaults: RequestConfig,
    sign_config: Option<SignConfig>,
    sink: Option<Arc<dyn ExportSink>>,
) -> Instance {
    Executor::new().create(defaults, sign_config, sink)
}

fn build_request(client: &reqwest::Client, config: &RequestConfig) -> Result<reqwest::Request> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let Some(value) = value else { continue };
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Configuration(format!("invalid header name `{}`: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| Error::Configuration(format!("invalid value for header `{}`: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }

    let content_type = config.content_type();
    let body = match &config.data {
        None => None,
        Some(Payload::Text(text)) => {
            if content_type.is_none() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
            }
            Some(text.clone().into_bytes())
        }
        Some(payload) => match payload.as_fields() {
            Some(fields) if content_type == Some(FORM_URLENCODED) => Some(
                serde_urlencoded::to_string(param_pairs(&fields))
                    .unwrap_or_default()
                    .into_bytes(),
            ),
            _ => {
                if content_type.is_none() {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                }
                Some(serde_json::to_vec(&payload.to_value())?)
            }
        },
    };

    let mut builder = client
        .request(config.method.clone(), build_url(config))
        .headers(headers);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    builder.build().map_err(Error::Transport)
}
