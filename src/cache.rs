//! In-memory catalog snapshots using moka
//!
//! Holds the current catalog and seasonal configuration as one immutable
//! `Arc` snapshot. A background refresher reloads it from disk; handlers take
//! the snapshot once per request so a reload never changes a quote mid-flight.

use moka::future::Cache;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::{Catalog, CatalogError};
use crate::pricing::seasonal::SeasonalConfig;

const SNAPSHOT_KEY: &str = "current";

/// Catalog and seasonal configuration captured together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingSnapshot {
    pub catalog: Catalog,
    pub seasonal: SeasonalConfig,
}

/// Application cache holding the pricing data snapshot
#[derive(Clone)]
pub struct PricingCache {
    /// Current snapshot (single entry, replaced as a whole)
    pub snapshots: Cache<String, Arc<PricingSnapshot>>,
}

impl PricingCache {
    /// Create an empty cache; the snapshot has no TTL and lives until replaced
    pub fn new() -> Self {
        Self {
            snapshots: Cache::builder().max_capacity(1).build(),
        }
    }

    /// Cache pre-loaded with the given data, mostly for tests and embedding
    pub async fn with_data(catalog: Catalog, seasonal: SeasonalConfig) -> Self {
        let cache = Self::new();
        cache.replace(PricingSnapshot { catalog, seasonal }).await;
        cache
    }

    /// Swap in a new snapshot in a single insert
    pub async fn replace(&self, snapshot: PricingSnapshot) {
        self.snapshots
            .insert(SNAPSHOT_KEY.to_string(), Arc::new(snapshot))
            .await;
    }

    async fn current(&self) -> Option<Arc<PricingSnapshot>> {
        self.snapshots.get(SNAPSHOT_KEY).await
    }

    /// Current snapshot. An empty catalog and standard rates stand in for
    /// data that has not been loaded yet.
    pub async fn snapshot(&self) -> Arc<PricingSnapshot> {
        match self.current().await {
            Some(snapshot) => snapshot,
            None => Arc::new(PricingSnapshot::default()),
        }
    }

    /// Get cache statistics for monitoring
    pub async fn stats(&self) -> CacheStats {
        match self.current().await {
            Some(snapshot) => CacheStats {
                catalog_loaded: true,
                catalog_items: snapshot.catalog.len(),
                seasons: snapshot.seasonal.seasons.len(),
            },
            None => CacheStats {
                catalog_loaded: false,
                catalog_items: 0,
                seasons: 0,
            },
        }
    }
}

impl Default for PricingCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub catalog_loaded: bool,
    pub catalog_items: usize,
    pub seasons: usize,
}

/// Files the snapshot is loaded from
#[derive(Debug, Clone)]
pub struct SnapshotSources {
    pub catalog_path: PathBuf,
    pub seasonal_path: PathBuf,
}

/// Load both files and replace the snapshot.
///
/// Both files must parse; on any error the previous snapshot stays in place.
pub async fn reload_snapshots(
    cache: &PricingCache,
    sources: &SnapshotSources,
) -> Result<CacheStats, CatalogError> {
    let raw_catalog = tokio::fs::read_to_string(&sources.catalog_path).await?;
    let raw_seasonal = tokio::fs::read_to_string(&sources.seasonal_path).await?;

    let snapshot = PricingSnapshot {
        catalog: Catalog::from_json_str(&raw_catalog)?,
        seasonal: SeasonalConfig::from_json_str(&raw_seasonal)?,
    };
    cache.replace(snapshot).await;

    Ok(cache.stats().await)
}

/// Start background catalog refresher
///
/// Reloads the snapshot every `period`. A failed reload keeps serving the
/// previous snapshot.
pub async fn start_catalog_refresher(
    cache: PricingCache,
    sources: SnapshotSources,
    period: Duration,
) {
    let mut interval = interval(period);
    // First tick completes immediately; startup already loaded the data
    interval.tick().await;

    loop {
        interval.tick().await;
        match reload_snapshots(&cache, &sources).await {
            Ok(stats) => info!("Catalog snapshot refreshed. Stats: {:?}", stats),
            Err(e) => warn!(
                catalog = %sources.catalog_path.display(),
                "Failed to refresh catalog, keeping previous snapshot: {}", e
            ),
        }
    }
}
