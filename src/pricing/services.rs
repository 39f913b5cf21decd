//! Trailer quote orchestration.
//!
//! Resolves the catalog record, dispatches to the event or commercial
//! strategies, applies the seasonal multiplier once and rounds to cents.
//! Failures are returned as [`PricingError`] and reported to the injected
//! [`DiagnosticSink`]; nothing here panics on missing or bad catalog data.

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use super::calculators::{apply_multiplier, to_cents, CostOverflow};
use super::diagnostics::{DiagnosticSink, PricingDiagnostic, Severity};
use super::event::{calculate_event_price, MAX_EVENT_DAYS};
use super::fallback::NO_PRICE_AVAILABLE;
use super::models::{
    Catalog, PricingRequest, PricingStrategy, ProductPriceRecord, StrategyQuote, UsageType,
};
use super::periods::{calculate_28_day_rate, calculate_weekly_rate, MIN_28_DAY_RENTAL};
use super::seasonal::{SeasonalRate, SeasonalResolver};
use super::tiers::calculate_monthly_tier_price;

/// A priced trailer line item
#[derive(Debug, Clone, PartialEq)]
pub struct TrailerQuote {
    pub sku: String,
    /// Rounded to cents, always with two decimal places
    pub final_cost: Decimal,
    /// Strategy description followed by the season description
    pub description: String,
    pub strategy: PricingStrategy,
    /// Unrounded cost before the seasonal multiplier
    pub base_cost: Decimal,
    pub multiplier: Decimal,
    pub season_description: String,
}

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Item {sku} not found in catalog")]
    ItemNotFound { sku: String },

    #[error("No rate for {sku} ({usage_type}, {rental_days} days): {message}")]
    RateUnavailable {
        sku: String,
        usage_type: UsageType,
        rental_days: u32,
        message: String,
    },

    #[error("Seasonal multiplier is not a positive number: {value} ({description})")]
    NonNumericMultiplier { value: String, description: String },

    #[error("Cost for {sku} is not a valid number: {context}")]
    NonNumericCost { sku: String, context: String },

    #[error("Rental days must be positive, got {rental_days}")]
    InvalidRentalDays { rental_days: u32 },
}

impl PricingError {
    /// Stable identifier used as `error_type` in diagnostics and API errors
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::ItemNotFound { .. } => "item_not_found",
            PricingError::RateUnavailable { .. } => "rate_unavailable",
            PricingError::NonNumericMultiplier { .. } => "non_numeric_multiplier",
            PricingError::NonNumericCost { .. } => "non_numeric_cost",
            PricingError::InvalidRentalDays { .. } => "invalid_rental_days",
        }
    }

    /// Severity when reported; `None` for caller mistakes, which are not
    /// catalog problems and are not reported.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            PricingError::RateUnavailable { .. } => Some(Severity::Warning),
            PricingError::ItemNotFound { .. }
            | PricingError::NonNumericMultiplier { .. }
            | PricingError::NonNumericCost { .. } => Some(Severity::Error),
            PricingError::InvalidRentalDays { .. } => None,
        }
    }

    fn diagnostic(&self, request: &PricingRequest) -> Option<PricingDiagnostic> {
        let severity = self.severity()?;
        let mut details = json!({
            "sku": request.sku,
            "rental_days": request.rental_days,
            "usage_type": request.usage_type,
            "rental_start_date": request.rental_start_date,
        });
        match self {
            PricingError::NonNumericMultiplier { value, description } => {
                details["multiplier"] = json!(value);
                details["season_description"] = json!(description);
            }
            PricingError::NonNumericCost { context, .. } => {
                details["context"] = json!(context);
            }
            _ => {}
        }

        let message = match self {
            PricingError::RateUnavailable { message, .. } => message.clone(),
            other => other.to_string(),
        };

        Some(PricingDiagnostic::new(self.kind(), severity, message, details))
    }
}

/// Strategies to try for a request, in order.
///
/// Event pricing applies only to event rentals of up to four days and is
/// then the only candidate. Everything else is commercial: monthly tier,
/// then the 28-day rate for rentals of 28 days or more, then weekly.
pub fn strategy_sequence(usage_type: UsageType, rental_days: u32) -> &'static [PricingStrategy] {
    match usage_type {
        UsageType::Event if rental_days <= MAX_EVENT_DAYS => &[PricingStrategy::Event],
        _ if rental_days >= MIN_28_DAY_RENTAL => &[
            PricingStrategy::MonthlyTier,
            PricingStrategy::Period28Day,
            PricingStrategy::Weekly,
        ],
        _ => &[PricingStrategy::MonthlyTier, PricingStrategy::Weekly],
    }
}

fn run_strategy(
    strategy: PricingStrategy,
    request: &PricingRequest,
    record: &ProductPriceRecord,
) -> Result<Option<StrategyQuote>, PricingError> {
    let overflow = |err: CostOverflow| PricingError::NonNumericCost {
        sku: request.sku.clone(),
        context: err.to_string(),
    };

    match strategy {
        PricingStrategy::Event => {
            calculate_event_price(&request.sku, request.rental_days, record).map_err(overflow)
        }
        PricingStrategy::MonthlyTier => {
            calculate_monthly_tier_price(request.rental_days, record).map_err(overflow)
        }
        PricingStrategy::Period28Day => {
            calculate_28_day_rate(request.rental_days, record).map_err(overflow)
        }
        PricingStrategy::Weekly => {
            calculate_weekly_rate(request.rental_days, record).map_err(overflow)
        }
    }
}

/// Convert the resolver's multiplier to a decimal, rejecting anything that is
/// not a positive finite number.
fn validate_multiplier(rate: &SeasonalRate) -> Result<Decimal, PricingError> {
    let value = rate.multiplier;
    let invalid = || PricingError::NonNumericMultiplier {
        value: value.to_string(),
        description: rate.description.clone(),
    };

    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }

    // Display gives the shortest decimal that round-trips, so 1.1 stays 1.1
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .filter(|m| m.is_sign_positive() && !m.is_zero())
        .ok_or_else(invalid)
}

fn price_request(
    request: &PricingRequest,
    seasonal: &dyn SeasonalResolver,
    catalog: &Catalog,
) -> Result<TrailerQuote, PricingError> {
    if request.rental_days == 0 {
        return Err(PricingError::InvalidRentalDays {
            rental_days: request.rental_days,
        });
    }

    let record = catalog
        .get(&request.sku)
        .ok_or_else(|| PricingError::ItemNotFound {
            sku: request.sku.clone(),
        })?;

    let season = seasonal.determine_seasonal_multiplier(request.rental_start_date);
    let multiplier = validate_multiplier(&season)?;

    let mut quote = None;
    for strategy in strategy_sequence(request.usage_type, request.rental_days) {
        quote = run_strategy(*strategy, request, record)?;
        if quote.is_some() {
            break;
        }
        debug!(sku = %request.sku, %strategy, "Strategy produced no price");
    }

    let quote = quote.ok_or_else(|| PricingError::RateUnavailable {
        sku: request.sku.clone(),
        usage_type: request.usage_type,
        rental_days: request.rental_days,
        message: NO_PRICE_AVAILABLE.to_string(),
    })?;

    let adjusted = apply_multiplier(quote.base_cost, multiplier).ok_or_else(|| {
        PricingError::NonNumericCost {
            sku: request.sku.clone(),
            context: CostOverflow("seasonal multiplier").to_string(),
        }
    })?;
    let final_cost = to_cents(adjusted);

    debug!(
        sku = %request.sku,
        strategy = %quote.strategy,
        base_cost = %quote.base_cost,
        %multiplier,
        %final_cost,
        "Trailer priced"
    );

    Ok(TrailerQuote {
        sku: request.sku.clone(),
        final_cost,
        description: format!("{} | {}", quote.description, season.description),
        strategy: quote.strategy,
        base_cost: quote.base_cost,
        multiplier,
        season_description: season.description,
    })
}

/// Calculate the cost of one trailer rental.
///
/// Looks up `request.sku` in `catalog`, selects the event or commercial
/// strategy, applies the seasonal multiplier from `seasonal` and rounds to
/// cents. Any failure other than [`PricingError::InvalidRentalDays`] is also
/// reported once to `sink`.
///
/// # Arguments
/// * `request` - SKU, rental length, usage type and start date
/// * `seasonal` - Resolver for the seasonal multiplier (e.g. a `SeasonalConfig`)
/// * `catalog` - Catalog snapshot; never modified
/// * `sink` - Destination for failure diagnostics
pub fn calculate_trailer_cost(
    request: &PricingRequest,
    seasonal: &dyn SeasonalResolver,
    catalog: &Catalog,
    sink: &dyn DiagnosticSink,
) -> Result<TrailerQuote, PricingError> {
    let result = price_request(request, seasonal, catalog);

    if let Err(err) = &result {
        if let Some(diagnostic) = err.diagnostic(request) {
            sink.record_pricing_diagnostic(&diagnostic);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::diagnostics::MemoryDiagnosticSink;
    use crate::pricing::models::PriceField;
    use crate::pricing::seasonal::{FixedSeasonalRate, SeasonalConfig};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn standard() -> FixedSeasonalRate {
        FixedSeasonalRate::new(1.0, "Standard rates")
    }

    fn catalog_with(sku: &str, record: ProductPriceRecord) -> Catalog {
        Catalog::new(HashMap::from([(sku.to_string(), record)]))
    }

    fn full_record() -> ProductPriceRecord {
        ProductPriceRecord {
            weekly_7_day: Some(dec!(250)),
            rate_28_day: Some(dec!(1000)),
            rate_2_5_month: Some(dec!(900)),
            rate_6_plus_month: Some(dec!(800)),
            rate_18_plus_month: Some(dec!(700)),
            event_standard: Some(dec!(300)),
            event_premium: Some(dec!(450)),
            event_premium_plus: Some(dec!(550)),
            event_premium_platinum: Some(dec!(700)),
        }
    }

    fn price(
        catalog: &Catalog,
        usage: UsageType,
        days: u32,
    ) -> (Result<TrailerQuote, PricingError>, MemoryDiagnosticSink) {
        let sink = MemoryDiagnosticSink::default();
        let request = PricingRequest::new("T-1", days, usage, start());
        let result = calculate_trailer_cost(&request, &standard(), catalog, &sink);
        (result, sink)
    }

    // ==================== strategy selection tests ====================

    #[test]
    fn test_strategy_sequence() {
        assert_eq!(
            strategy_sequence(UsageType::Event, 4),
            &[PricingStrategy::Event]
        );
        assert_eq!(
            strategy_sequence(UsageType::Event, 5),
            &[PricingStrategy::MonthlyTier, PricingStrategy::Weekly]
        );
        assert_eq!(
            strategy_sequence(UsageType::Commercial, 3),
            &[PricingStrategy::MonthlyTier, PricingStrategy::Weekly]
        );
        assert_eq!(
            strategy_sequence(UsageType::Commercial, 28),
            &[
                PricingStrategy::MonthlyTier,
                PricingStrategy::Period28Day,
                PricingStrategy::Weekly
            ]
        );
    }

    #[test]
    fn test_event_with_five_days_uses_commercial() {
        let catalog = catalog_with("T-1", full_record());

        let quote = price(&catalog, UsageType::Event, 5).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::Weekly);
        assert_eq!(quote.final_cost, dec!(250.00));
    }

    #[test]
    fn test_commercial_short_rental_is_not_event_priced() {
        let catalog = catalog_with("T-1", full_record());

        let quote = price(&catalog, UsageType::Commercial, 3).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::Weekly);
        assert_eq!(quote.final_cost, dec!(250));
    }

    #[test]
    fn test_event_failure_does_not_fall_into_commercial() {
        let record = ProductPriceRecord::default()
            .with(PriceField::Rate28Day, dec!(1000))
            .with(PriceField::Rate2To5Month, dec!(900));
        let catalog = catalog_with("T-1", record);

        let (result, sink) = price(&catalog, UsageType::Event, 2);
        assert_eq!(result.unwrap_err().kind(), "rate_unavailable");
        assert_eq!(sink.len(), 1);
    }

    // ==================== commercial path tests ====================

    #[test]
    fn test_monthly_tier_wins_over_periods() {
        let catalog = catalog_with("T-1", full_record());

        let quote = price(&catalog, UsageType::Commercial, 200).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::MonthlyTier);
        // 800 / 30.4375 * 200
        assert_eq!(quote.final_cost, dec!(5256.67));
    }

    #[test]
    fn test_28_day_used_under_two_months() {
        let catalog = catalog_with("T-1", full_record());

        let quote = price(&catalog, UsageType::Commercial, 56).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::Period28Day);
        assert_eq!(quote.base_cost, dec!(2000));
        assert_eq!(quote.final_cost.to_string(), "2000.00");
    }

    #[test]
    fn test_weekly_used_under_28_days() {
        let catalog = catalog_with("T-1", full_record());

        let quote = price(&catalog, UsageType::Commercial, 8).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::Weekly);
        assert_eq!(quote.final_cost, dec!(500));
    }

    #[test]
    fn test_unpriced_tier_falls_through_to_periods() {
        // 2-5 month tier chain is 28-day then weekly; only weekly is set, so the
        // tier resolves via fallback (250 x 4) and is prorated.
        let record = ProductPriceRecord::default().with(PriceField::Weekly7Day, dec!(250));
        let catalog = catalog_with("T-1", record);

        let quote = price(&catalog, UsageType::Commercial, 90).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::MonthlyTier);
        assert!(quote.description.contains("(fallback: weekly rate x 4)"));

        // 18+ tier chain (6+, 2-5) is empty here; the request falls to 28-day
        // via its weekly fallback.
        let quote = price(&catalog, UsageType::Commercial, 600).0.unwrap();
        assert_eq!(quote.strategy, PricingStrategy::Period28Day);
        // 1000 * 600 / 28
        assert_eq!(quote.final_cost, dec!(21428.57));
    }

    // ==================== seasonal multiplier tests ====================

    #[test]
    fn test_multiplier_applied_once() {
        let catalog = catalog_with("T-1", full_record());
        let sink = MemoryDiagnosticSink::default();
        let request = PricingRequest::new("T-1", 3, UsageType::Event, start());
        let peak = FixedSeasonalRate::new(1.25, "Summer Peak pricing (x1.25)");

        let quote = calculate_trailer_cost(&request, &peak, &catalog, &sink).unwrap();
        assert_eq!(quote.base_cost, dec!(300));
        assert_eq!(quote.multiplier, dec!(1.25));
        assert_eq!(quote.final_cost, dec!(375.00));
        assert_eq!(
            quote.description,
            "Event rate for 3 days: $300.00 | Summer Peak pricing (x1.25)"
        );
    }

    #[test]
    fn test_multiplier_from_seasonal_config() {
        let catalog = catalog_with("T-1", full_record());
        let sink = MemoryDiagnosticSink::default();
        let config = SeasonalConfig::from_json_str(
            r#"{"seasons": [{"name": "Spring", "rate": 1.1, "start": "03-01", "end": "05-31"}]}"#,
        )
        .unwrap();
        let request = PricingRequest::new("T-1", 8, UsageType::Commercial, start());

        let quote = calculate_trailer_cost(&request, &config, &catalog, &sink).unwrap();
        assert_eq!(quote.multiplier, dec!(1.1));
        assert_eq!(quote.final_cost, dec!(550.00));
        assert!(quote.description.ends_with("| Spring pricing (x1.10)"));
    }

    #[test]
    fn test_invalid_multiplier_fails_closed() {
        let catalog = catalog_with("T-1", full_record());
        let request = PricingRequest::new("T-1", 3, UsageType::Event, start());

        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let sink = MemoryDiagnosticSink::default();
            let bad = FixedSeasonalRate::new(value, "corrupt");
            let err = calculate_trailer_cost(&request, &bad, &catalog, &sink).unwrap_err();

            assert_eq!(err.kind(), "non_numeric_multiplier");
            let entries = sink.entries();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].severity, Severity::Error);
        }
    }

    // ==================== failure tests ====================

    #[test]
    fn test_item_not_found_reported_once() {
        let catalog = catalog_with("OTHER", full_record());

        let (result, sink) = price(&catalog, UsageType::Event, 3);
        assert_eq!(
            result.unwrap_err(),
            PricingError::ItemNotFound {
                sku: "T-1".to_string()
            }
        );

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].error_type, "item_not_found");
        assert_eq!(entries[0].service, "trailer_calculator");
        assert_eq!(entries[0].details["sku"], "T-1");
    }

    #[test]
    fn test_all_fields_absent_is_rate_unavailable() {
        let catalog = catalog_with("T-1", ProductPriceRecord::default());

        for (usage, days) in [
            (UsageType::Event, 3),
            (UsageType::Commercial, 8),
            (UsageType::Commercial, 56),
            (UsageType::Commercial, 400),
        ] {
            let (result, sink) = price(&catalog, usage, days);
            match result.unwrap_err() {
                PricingError::RateUnavailable { message, .. } => {
                    assert_eq!(message, "No price available")
                }
                other => panic!("unexpected error: {:?}", other),
            }

            let entries = sink.entries();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].severity, Severity::Warning);
            assert_eq!(entries[0].message, "No price available");
        }
    }

    #[test]
    fn test_zero_days_rejected_without_diagnostic() {
        let catalog = catalog_with("T-1", full_record());

        let (result, sink) = price(&catalog, UsageType::Commercial, 0);
        assert_eq!(
            result.unwrap_err(),
            PricingError::InvalidRentalDays { rental_days: 0 }
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_cost_overflow_is_non_numeric_cost() {
        let record = ProductPriceRecord::default().with(PriceField::Weekly7Day, Decimal::MAX);
        let catalog = catalog_with("T-1", record);

        let (result, sink) = price(&catalog, UsageType::Commercial, 15);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), "non_numeric_cost");
        assert!(err.to_string().contains("weekly billing overflowed"));
        assert_eq!(sink.entries()[0].details["context"], "weekly billing overflowed");
    }

    #[test]
    fn test_fallback_overflow_does_not_switch_rates() {
        // Weekly is the first 28-day substitute; x 4 overflows, so the quote
        // fails instead of using the 2-5 month rate further down the chain.
        let record = ProductPriceRecord::default()
            .with(PriceField::Weekly7Day, Decimal::MAX)
            .with(PriceField::Rate2To5Month, dec!(900));
        let catalog = catalog_with("T-1", record);

        let (result, sink) = price(&catalog, UsageType::Commercial, 56);
        assert_eq!(
            result.unwrap_err(),
            PricingError::NonNumericCost {
                sku: "T-1".to_string(),
                context: "weekly to monthly conversion overflowed".to_string(),
            }
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].severity, Severity::Error);
    }

    // ==================== result property tests ====================

    #[test]
    fn test_results_are_non_negative_cents() {
        let catalog = catalog_with("T-1", full_record());

        for usage in [UsageType::Event, UsageType::Commercial] {
            for days in 1..=800 {
                let quote = price(&catalog, usage, days).0.unwrap();
                assert!(quote.final_cost >= Decimal::ZERO);
                assert_eq!(quote.final_cost.scale(), 2);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let catalog = catalog_with("T-1", full_record());

        let first = price(&catalog, UsageType::Commercial, 200).0.unwrap();
        let second = price(&catalog, UsageType::Commercial, 200).0.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.final_cost.to_string(), second.final_cost.to_string());
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::ItemNotFound {
            sku: "ADA-9".to_string(),
        };
        assert!(err.to_string().contains("ADA-9"));

        let err = PricingError::RateUnavailable {
            sku: "ADA-9".to_string(),
            usage_type: UsageType::Event,
            rental_days: 3,
            message: "No price available".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No rate for ADA-9 (event, 3 days): No price available"
        );
    }
}
