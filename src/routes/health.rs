//! Health check route

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog_loaded: bool,
    pub catalog_items: usize,
    pub seasons: usize,
}

/// Service health and snapshot summary
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.cache.stats().await;

    Json(HealthResponse {
        status: if stats.catalog_loaded { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        catalog_loaded: stats.catalog_loaded,
        catalog_items: stats.catalog_items,
        seasons: stats.seasons,
    })
}
