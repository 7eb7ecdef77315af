use anyhow::Result;
use tracing_subscriber::EnvFilter;

use depot::config::AppConfig;
use depot::models::seed;
use depot::server::build_router;
use depot::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depot=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default(),
    };

    let store = MemoryStore::new();
    seed::seed_demo(&store).await?;

    let app = build_router(&config, store);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
