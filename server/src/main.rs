use clap::Parser;
use customers_server::{
    app, config::ServerConfig, connect_storage, seed::seed_demo_data,
};
use monitoring::CallMonitor;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    info!(storage = ?config.storage, "Initializing owner storage...");

    let (owners, backend) = connect_storage(&config).await?;

    if config.seed_demo_data {
        seed_demo_data(&owners).await?;
    }

    let app = app(owners, backend, CallMonitor::new());

    info!("Customers service starting on {}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
