use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "streamvault=info,tower_http=info";
const REQUIRED_VARS: [&str; 1] = ["CATALOG_API_URL"];

#[tokio::main]
async fn main() -> Result<()> {
    // Read .env before the filter so RUST_LOG can come from it.
    let dotenv_path = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().compact().with_target(false))
        .init();

    match dotenv_path {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) => tracing::warn!("No .env file loaded ({}), using process environment", e),
    }
    tracing::info!("Starting StreamVault v{}", env!("CARGO_PKG_VERSION"));

    for key in REQUIRED_VARS {
        env::var(key).with_context(|| format!("Missing required environment variable: {key}"))?;
    }

    streamvault::app::run_server().await
}
