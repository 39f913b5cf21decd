//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::diagnostics::PricingDiagnostic;
use super::models::{PricingStrategy, ProductPriceRecord};
use super::services::TrailerQuote;

/// Response for a trailer quote
#[derive(Debug, Serialize)]
pub struct TrailerQuoteResponse {
    pub quote_id: Uuid,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_cost: Decimal,
    pub description: String,
    pub strategy: PricingStrategy,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    pub season_description: String,
}

impl From<TrailerQuote> for TrailerQuoteResponse {
    fn from(quote: TrailerQuote) -> Self {
        Self {
            quote_id: Uuid::new_v4(),
            sku: quote.sku,
            final_cost: quote.final_cost,
            description: quote.description,
            strategy: quote.strategy,
            base_cost: quote.base_cost,
            multiplier: quote.multiplier,
            season_description: quote.season_description,
        }
    }
}

/// Catalog record for one SKU
#[derive(Debug, Serialize)]
pub struct CatalogItemResponse {
    pub sku: String,
    pub prices: ProductPriceRecord,
}

/// Recent pricing diagnostics
#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub count: usize,
    pub diagnostics: Vec<PricingDiagnostic>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
