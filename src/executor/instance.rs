use super::Executor;
use crate::debug::{self, ExportSink, DEBUG_CONFIG};
use crate::error::Result;
use crate::oauth::SignConfig;
use crate::request::{Payload, RequestConfig};
use crate::response::Reply;
use std::sync::Arc;

/// Long-lived client bound to base request settings.
///
/// Every call merges its config over the base config and then runs the same
/// pipeline as [`Executor::execute`]. The export sink is shared by all calls
/// made through the instance, so concurrent debug exports may overwrite each
/// other.
///
/// `debug` and `return_full_response` are plain flags, so a call can turn
/// them on but never off: when the base config sets one, every call through
/// the instance has it set.
#[derive(Clone)]
pub struct Instance {
    executor: Executor,
    defaults: RequestConfig,
    sign_config: Option<SignConfig>,
    sink: Option<Arc<dyn ExportSink>>,
}

impl Instance {
    pub(crate) fn new(
        executor: Executor,
        defaults: RequestConfig,
        sign_config: Option<SignConfig>,
        sink: Option<Arc<dyn ExportSink>>,
    ) -> Self {
        if defaults.debug {
            debug::export(sink.as_deref(), DEBUG_CONFIG, &defaults);
        }
        Self {
            executor,
            defaults,
            sign_config,
            sink,
        }
    }

    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    pub async fn request(&self, config: RequestConfig) -> Result<Reply> {
        let config = self.merge(config);
        self.executor
            .execute(self.sink.as_deref(), config, self.sign_config.as_ref())
            .await
    }

    pub async fn get(&self, url: impl Into<String>) -> Result<Reply> {
        self.request(RequestConfig::get(url)).await
    }

    pub async fn post(&self, url: impl Into<String>, data: impl Into<Payload>) -> Result<Reply> {
        self.request(RequestConfig::post(url).data(data)).await
    }

    /// Per-call values win. Headers and params merge key by key.
    fn merge(&self, config: RequestConfig) -> RequestConfig {
        let defaults = &self.defaults;

        let mut headers = defaults.headers.clone();
        headers.extend(config.headers);
        let mut params = defaults.params.clone();
        params.extend(config.params);

        RequestConfig {
            method: config.method,
            url: config.url,
            base_url: config.base_url.or_else(|| defaults.base_url.clone()),
            headers,
            params,
            data: config.data,
            body: config.body.or_else(|| defaults.body.clone()),
            params_serializer: config.params_serializer.or(defaults.params_serializer),
            debug: config.debug || defaults.debug,
            return_full_response: config.return_full_response || defaults.return_full_response,
        }
    }
}
