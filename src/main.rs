use anyhow::{Context, Result};
use courier::{CourierConfig, Executor, RequestConfig};
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=info".into()),
        )
        .init();

    let request_path = std::env::args()
        .nth(1)
        .context("usage: courier <request.json>")?;

    let config = match std::env::var("COURIER_CONFIG") {
        Ok(path) => CourierConfig::from_file(Path::new(&path))?,
        Err(_) => CourierConfig::default(),
    }
    .with_env();

    let raw = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("Failed to read request file {}", request_path))?;
    let request: RequestConfig =
        serde_json::from_str(&raw).context("Failed to parse request config")?;

    // The token is opaque to courier; JSON is passed through, anything else as a string
    let token = std::env::var("COURIER_OAUTH_TOKEN").ok().map(|raw| {
        serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
    });
    let sign_config = config.signer.sign_config(token);

    info!(
        method = %request.method,
        url = %request.url,
        signed = sign_config.is_some(),
        "Executing request"
    );

    let executor = Executor::from_config(&config.transport)?;
    let reply = executor
        .execute(None, request, sign_config.as_ref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&reply.into_value())?);
    Ok(())
}
