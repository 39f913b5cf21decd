//! HTTP handlers for the pricing API.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use super::diagnostics::TracingDiagnosticSink;
use super::requests::TrailerCostRequest;
use super::responses::{CatalogItemResponse, DiagnosticsResponse, TrailerQuoteResponse};
use super::services::calculate_trailer_cost;
use crate::error::{AppError, Result};
use crate::AppState;

/// Pricing API routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trailer", post(quote_trailer))
        .route("/catalog/:sku", get(get_catalog_item))
        .route("/diagnostics", get(list_diagnostics))
}

/// Price a single trailer rental
async fn quote_trailer(
    State(state): State<AppState>,
    Json(body): Json<TrailerCostRequest>,
) -> Result<Json<TrailerQuoteResponse>> {
    let request = body.into_pricing_request(Utc::now().date_naive());
    let snapshot = state.cache.snapshot().await;
    let sink = (TracingDiagnosticSink, state.diagnostics.clone());

    let quote = calculate_trailer_cost(
        &request,
        &snapshot.seasonal,
        &snapshot.catalog,
        &sink,
    )?;

    let response = TrailerQuoteResponse::from(quote);
    info!(
        quote_id = %response.quote_id,
        sku = %response.sku,
        final_cost = %response.final_cost,
        strategy = %response.strategy,
        "Trailer quoted"
    );

    Ok(Json(response))
}

/// Catalog record for one SKU
async fn get_catalog_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<CatalogItemResponse>> {
    let snapshot = state.cache.snapshot().await;
    let prices = snapshot
        .catalog
        .get(&sku)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found in catalog", sku)))?;

    Ok(Json(CatalogItemResponse { sku, prices }))
}

/// Most recent pricing diagnostics, oldest first
async fn list_diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let diagnostics = state.diagnostics.entries();

    Json(DiagnosticsResponse {
        count: diagnostics.len(),
        diagnostics,
    })
}
