//! dorkscope server entry point

use anyhow::Result;
use dorkscope::{
    config,
    network::HttpClient,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting dorkscope v{}", dorkscope::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let registry = ProviderLoader::load(&settings.providers)?;

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let app = create_router(AppState::new(settings, registry, client));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
