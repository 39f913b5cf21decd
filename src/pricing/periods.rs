//! Period pricing for rentals too short for a monthly tier.
//!
//! The two periods bill differently: the 28-day rate is a volume
//! discount prorated to the day, while the weekly rate is a minimum billing
//! unit charged in whole weeks.

use tracing::debug;

use super::calculators::{
    billable_weeks, bill_whole_weeks, format_money, prorate_28_day_rate, CostOverflow,
};
use super::fallback::resolve_price;
use super::models::{PriceField, PricingStrategy, ProductPriceRecord, StrategyQuote};

/// Shortest rental, in days, that the 28-day rate applies to.
pub const MIN_28_DAY_RENTAL: u32 = 28;

/// Price with the 28-day rate: `rate_28_day * (rental_days / 28)`.
///
/// `Ok(None)` when the rental is under 28 days or no rate can be resolved.
pub fn calculate_28_day_rate(
    rental_days: u32,
    record: &ProductPriceRecord,
) -> Result<Option<StrategyQuote>, CostOverflow> {
    if rental_days < MIN_28_DAY_RENTAL {
        return Ok(None);
    }

    let Some(resolved) = resolve_price(record, PriceField::Rate28Day)? else {
        debug!(rental_days, "No 28-day rate in fallback chain");
        return Ok(None);
    };

    let base_cost = prorate_28_day_rate(resolved.amount, rental_days)
        .ok_or(CostOverflow("28-day proration"))?;

    Ok(Some(StrategyQuote {
        strategy: PricingStrategy::Period28Day,
        base_cost,
        description: format!(
            "28-day rate of {} prorated over {} days{}",
            format_money(resolved.amount),
            rental_days,
            resolved.fallback_suffix
        ),
    }))
}

/// Price with the weekly rate: `weekly_7_day * ceil(rental_days / 7)`.
pub fn calculate_weekly_rate(
    rental_days: u32,
    record: &ProductPriceRecord,
) -> Result<Option<StrategyQuote>, CostOverflow> {
    let Some(resolved) = resolve_price(record, PriceField::Weekly7Day)? else {
        debug!(rental_days, "No weekly rate in fallback chain");
        return Ok(None);
    };

    let weeks = billable_weeks(rental_days);
    let base_cost =
        bill_whole_weeks(resolved.amount, rental_days).ok_or(CostOverflow("weekly billing"))?;
    let week_word = if weeks == 1 { "week" } else { "weeks" };

    Ok(Some(StrategyQuote {
        strategy: PricingStrategy::Weekly,
        base_cost,
        description: format!(
            "Weekly rate of {} x {} {} ({} days){}",
            format_money(resolved.amount),
            weeks,
            week_word,
            rental_days,
            resolved.fallback_suffix
        ),
    }))
}
