//! Dream Library - boots the shared catalog and reports its state.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dream_library::{config::AppConfig, models::ListFilter, LibraryStore};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("dream_library={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Dream Library v{}", env!("CARGO_PKG_VERSION"));

    let store = LibraryStore::open(&config)?;
    let stats = store.stats();

    tracing::info!(
        "Catalog ready: {} entries, {} available, {} checked out, {} reads (snapshot v{})",
        stats.total,
        stats.available,
        stats.checked_out,
        stats.total_reads,
        store.snapshot_version()
    );

    match store.active_user() {
        Some(user) => {
            tracing::info!(
                "Active user {}: {} authored, reading {}",
                user,
                store.list(ListFilter::Mine, "").len(),
                stats.reading_now
            );
        }
        None => tracing::info!("No active user set"),
    }

    Ok(())
}
