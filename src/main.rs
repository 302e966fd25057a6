use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wage_ledger::api::{AppState, create_router};
use wage_ledger::config::{ConfigLoader, ServerConfig};
use wage_ledger::ledger::Ledger;
use wage_ledger::store::{LedgerStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wage_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = ServerConfig::from_env()?;
    let loader = ConfigLoader::load(&server.config_dir)?;
    tracing::info!(
        config_dir = %server.config_dir.display(),
        seeded_rates = loader.config().rates.len(),
        "Configuration loaded"
    );

    let store: Arc<dyn LedgerStore> = match &server.data_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening ledger snapshot");
            Arc::new(MemoryStore::open(path, loader.config())?)
        }
        None => {
            tracing::warn!("No snapshot path set; ledger data lives in memory only");
            Arc::new(MemoryStore::seeded(loader.config()))
        }
    };

    let app = create_router(AppState::new(Ledger::new(store)));

    tracing::info!("Starting server on {}", server.addr);
    let listener = tokio::net::TcpListener::bind(server.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
