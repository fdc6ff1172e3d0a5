use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use portfolio_analytics_backend::{config::Config, create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!("Starting portfolio analytics with {:?}", config);

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
