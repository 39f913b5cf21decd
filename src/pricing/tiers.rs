//! Long-term monthly rate tiers.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::calculators::{
    calculate_prorated_monthly_cost, days_to_months, format_money, CostOverflow,
};
use super::fallback::{resolve_price, NO_PRICE_AVAILABLE};
use super::models::{PriceField, PricingStrategy, ProductPriceRecord, StrategyQuote};

/// Monthly pricing bracket selected by rental length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyTier {
    TwoToFiveMonths,
    SixPlusMonths,
    EighteenPlusMonths,
}

impl MonthlyTier {
    /// Pick the tier for a duration in months.
    ///
    /// Checked highest first and the first match wins, so exactly 18.0 months
    /// is 18+ and exactly 6.0 months is 6+. Under two months no tier applies.
    pub fn for_months(months: Decimal) -> Option<Self> {
        if months >= Decimal::from(18) {
            Some(MonthlyTier::EighteenPlusMonths)
        } else if months >= Decimal::from(6) {
            Some(MonthlyTier::SixPlusMonths)
        } else if months >= Decimal::from(2) {
            Some(MonthlyTier::TwoToFiveMonths)
        } else {
            None
        }
    }

    pub fn field(self) -> PriceField {
        match self {
            MonthlyTier::TwoToFiveMonths => PriceField::Rate2To5Month,
            MonthlyTier::SixPlusMonths => PriceField::Rate6PlusMonth,
            MonthlyTier::EighteenPlusMonths => PriceField::Rate18PlusMonth,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MonthlyTier::TwoToFiveMonths => "2-5 month",
            MonthlyTier::SixPlusMonths => "6+ month",
            MonthlyTier::EighteenPlusMonths => "18+ month",
        }
    }
}

/// Outcome of tier selection for a rental that qualifies for monthly pricing
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRateTier {
    pub tier: MonthlyTier,
    /// `None` when the tier and its whole fallback chain are unpriced
    pub monthly_rate: Option<Decimal>,
    /// Empty for the primary column, a fallback note, or "No price available"
    pub fallback_suffix: String,
}

impl MonthlyRateTier {
    pub fn tier_label(&self) -> &'static str {
        self.tier.label()
    }
}

/// Select the monthly tier for `rental_days` and resolve its rate.
///
/// Returns `None` when the rental is under two months; the caller then falls
/// through to 28-day or weekly pricing. A tier whose rate cannot be resolved
/// is returned with `monthly_rate: None` rather than dropping to a lower tier.
pub fn determine_monthly_rate_tier(
    rental_days: u32,
    record: &ProductPriceRecord,
) -> Result<Option<MonthlyRateTier>, CostOverflow> {
    let months = days_to_months(rental_days);
    let Some(tier) = MonthlyTier::for_months(months) else {
        return Ok(None);
    };

    let (monthly_rate, fallback_suffix) = match resolve_price(record, tier.field())? {
        Some(resolved) => (Some(resolved.amount), resolved.fallback_suffix),
        None => (None, NO_PRICE_AVAILABLE.to_string()),
    };

    debug!(
        rental_days,
        %months,
        tier = tier.label(),
        priced = monthly_rate.is_some(),
        "Monthly tier selected"
    );

    Ok(Some(MonthlyRateTier {
        tier,
        monthly_rate,
        fallback_suffix,
    }))
}

/// Price a rental on its monthly tier, prorated to the exact day count.
///
/// `Ok(None)` when no tier applies or the selected tier has no rate.
pub fn calculate_monthly_tier_price(
    rental_days: u32,
    record: &ProductPriceRecord,
) -> Result<Option<StrategyQuote>, CostOverflow> {
    let Some(selection) = determine_monthly_rate_tier(rental_days, record)? else {
        return Ok(None);
    };
    let Some(monthly_rate) = selection.monthly_rate else {
        return Ok(None);
    };

    let base_cost = calculate_prorated_monthly_cost(monthly_rate, rental_days)
        .ok_or(CostOverflow("monthly proration"))?;

    Ok(Some(StrategyQuote {
        strategy: PricingStrategy::MonthlyTier,
        base_cost,
        description: format!(
            "{} rate of {}/month prorated over {} days{}",
            selection.tier_label(),
            format_money(monthly_rate),
            rental_days,
            selection.fallback_suffix
        ),
    }))
}
