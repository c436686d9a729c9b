use anyhow::{Context, Result};
use clap::Parser;
use parley_server::{ServerConfig, SignalingService, signaling_routes};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let service = SignalingService::spawn(config.router_config());
    let app = signaling_routes(service);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("WebSocket server is running on port {}", config.port);

    axum::serve(listener, app).await.context("Signaling server failed")?;
    Ok(())
}
