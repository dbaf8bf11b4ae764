use anyhow::Context;
use gaia::{AppState, GaiaConfig, HttpServer};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GAIA_CONFIG").ok())
        .map(PathBuf::from);

    let config = GaiaConfig::load(config_path.as_deref()).context("loading configuration")?;
    info!(
        "Gaia v{} starting (summary provider: {:?})",
        gaia::version(),
        config.summary.provider
    );

    let state = AppState::from_config(&config).context("building upstream clients")?;
    let server = HttpServer::new(state, config.server.clone());

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;
    Ok(())
}
