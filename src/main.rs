//! Trailer pricing server

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trailer_pricing::cache::{reload_snapshots, start_catalog_refresher, PricingCache};
use trailer_pricing::config::Config;
use trailer_pricing::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailer_pricing=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting trailer-pricing v{} with {:?}",
        env!("CARGO_PKG_VERSION"),
        config
    );

    let cache = PricingCache::new();
    let sources = config.snapshot_sources();
    let stats = reload_snapshots(&cache, &sources)
        .await
        .with_context(|| format!("loading catalog from {}", sources.catalog_path.display()))?;
    info!("Catalog loaded. Stats: {:?}", stats);

    tokio::spawn(start_catalog_refresher(
        cache.clone(),
        sources,
        config.catalog_refresh,
    ));

    let state = AppState::new(cache, config.diagnostics_capacity);
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
