//! Trailer rental pricing engine.
//!
//! Turns a rental request (SKU, days, usage type, start date) and a catalog
//! snapshot into a quote. The engine modules are synchronous and have no
//! knowledge of HTTP; `routes` exposes them over axum.

pub mod calculators;
pub mod diagnostics;
pub mod event;
pub mod fallback;
pub mod models;
pub mod periods;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod seasonal;
pub mod services;
pub mod tiers;

// Re-export commonly used items
pub use calculators::round_money;
pub use diagnostics::{DiagnosticSink, MemoryDiagnosticSink, PricingDiagnostic, TracingDiagnosticSink};
pub use models::{Catalog, PricingRequest, ProductPriceRecord, UsageType};
pub use routes::router;
pub use seasonal::{SeasonalConfig, SeasonalResolver};
pub use services::{calculate_trailer_cost, PricingError, TrailerQuote};
