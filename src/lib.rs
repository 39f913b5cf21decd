//! Trailer rental pricing service.
//!
//! The pricing engine lives in [`pricing`] and is usable on its own; the rest
//! of the crate serves it over HTTP with catalog snapshots held in memory.

use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;

use cache::PricingCache;
use pricing::MemoryDiagnosticSink;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cache: PricingCache,
    pub diagnostics: Arc<MemoryDiagnosticSink>,
}

impl AppState {
    pub fn new(cache: PricingCache, diagnostics_capacity: usize) -> Self {
        Self {
            cache,
            diagnostics: Arc::new(MemoryDiagnosticSink::new(diagnostics_capacity)),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/pricing", pricing::router())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
