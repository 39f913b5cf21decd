//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no catalog lookups, no fallbacks.
//! Callers decide which rate applies; these only do the arithmetic. Overflow
//! is reported as `None`.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Average month length in days (365.25 / 12).
pub const DAYS_PER_MONTH: Decimal = dec!(30.4375);

/// Length of the 28-day billing period.
pub const DAYS_PER_28_DAY_PERIOD: Decimal = dec!(28);

/// Days in a billed week.
pub const DAYS_PER_WEEK: u32 = 7;

/// Arithmetic on a price exceeded the decimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} overflowed")]
pub struct CostOverflow(pub &'static str);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use trailer_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round to cents and pin the scale to exactly two places, so `300` renders as
/// `300.00`.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded = round_money(amount, 2);
    rounded.rescale(2);
    rounded
}

/// Format an amount for quote descriptions, e.g. `$1000.00`.
pub fn format_money(amount: Decimal) -> String {
    format!("${}", to_cents(amount))
}

/// Convert a day count to months using the average month length.
pub fn days_to_months(rental_days: u32) -> Decimal {
    Decimal::from(rental_days) / DAYS_PER_MONTH
}

/// Prorate a monthly rate to an exact day count.
///
/// `(base_monthly_rate / 30.4375) * rental_days`, unrounded.
pub fn calculate_prorated_monthly_cost(
    base_monthly_rate: Decimal,
    rental_days: u32,
) -> Option<Decimal> {
    base_monthly_rate
        .checked_mul(Decimal::from(rental_days))?
        .checked_div(DAYS_PER_MONTH)
}

/// Prorate a 28-day rate fractionally: `rate_28_day * (rental_days / 28)`.
pub fn prorate_28_day_rate(rate_28_day: Decimal, rental_days: u32) -> Option<Decimal> {
    rate_28_day
        .checked_mul(Decimal::from(rental_days))?
        .checked_div(DAYS_PER_28_DAY_PERIOD)
}

/// Number of whole weeks billed for a rental; partial weeks round up.
pub fn billable_weeks(rental_days: u32) -> u32 {
    rental_days.div_ceil(DAYS_PER_WEEK)
}

/// Weekly billing: `weekly_7_day * ceil(rental_days / 7)`.
pub fn bill_whole_weeks(weekly_rate: Decimal, rental_days: u32) -> Option<Decimal> {
    weekly_rate.checked_mul(Decimal::from(billable_weeks(rental_days)))
}

/// Apply a seasonal multiplier to a base cost.
pub fn apply_multiplier(base_cost: Decimal, multiplier: Decimal) -> Option<Decimal> {
    base_cost.checked_mul(multiplier)
}
