//! Event pricing for short rentals.

use tracing::debug;

use super::calculators::{format_money, CostOverflow};
use super::fallback::resolve_price;
use super::models::{PriceField, PricingStrategy, ProductPriceRecord, StrategyQuote};

/// Longest rental, in days, that can be priced as an event.
pub const MAX_EVENT_DAYS: u32 = 4;

/// Price a rental of up to four days at the flat event rate.
///
/// Uses `event_standard`, or its fallback chain (`event_premium`, then the
/// weekly rate) when absent. The event rate is flat: it is not scaled by the
/// number of days. `Ok(None)` for longer rentals or when no rate exists.
pub fn calculate_event_price(
    sku: &str,
    rental_days: u32,
    record: &ProductPriceRecord,
) -> Result<Option<StrategyQuote>, CostOverflow> {
    if rental_days > MAX_EVENT_DAYS {
        debug!(sku, rental_days, "Rental too long for event pricing");
        return Ok(None);
    }

    let Some(resolved) = resolve_price(record, PriceField::EventStandard)? else {
        debug!(sku, "No event rate in fallback chain");
        return Ok(None);
    };

    debug!(
        sku,
        rental_days,
        source = resolved.source.key(),
        fallback = resolved.is_fallback(),
        "Event price resolved"
    );

    let day_word = if rental_days == 1 { "day" } else { "days" };

    Ok(Some(StrategyQuote {
        strategy: PricingStrategy::Event,
        base_cost: resolved.amount,
        description: format!(
            "Event rate for {} {}: {}{}",
            rental_days,
            day_word,
            format_money(resolved.amount),
            resolved.fallback_suffix
        ),
    }))
}
