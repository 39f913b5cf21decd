//! Fallback price substitution.
//!
//! When a record lacks the price column a strategy needs, a related column can
//! stand in for it. The substitution hierarchy is a static table keyed by
//! [`PriceField`]; adding a column fails to compile until its chain exists.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculators::CostOverflow;
use super::models::{PriceField, ProductPriceRecord, RateUnit};

/// Weeks per month when converting between weekly and monthly columns.
///
/// NOTE: a 30.4375-day month is ~4.35 weeks; the catalog has always been
/// converted with a flat 4.0 and quotes depend on it.
pub const WEEKS_PER_MONTH_FACTOR: Decimal = dec!(4.0);

/// Suffix returned when no candidate in the chain has a price.
pub const NO_PRICE_AVAILABLE: &str = "No price available";

/// Ordered substitutes for a missing column.
pub fn fallback_chain(missing: PriceField) -> &'static [PriceField] {
    use PriceField::*;

    match missing {
        Weekly7Day => &[Rate28Day, Rate2To5Month],
        Rate28Day => &[Weekly7Day, Rate2To5Month],
        Rate2To5Month => &[Rate28Day, Weekly7Day],
        Rate6PlusMonth => &[Rate2To5Month, Rate28Day],
        Rate18PlusMonth => &[Rate6PlusMonth, Rate2To5Month],
        EventStandard => &[EventPremium, Weekly7Day],
        EventPremium => &[EventStandard, EventPremiumPlus],
        EventPremiumPlus => &[EventPremium, EventPremiumPlatinum],
        EventPremiumPlatinum => &[EventPremiumPlus, EventPremium],
    }
}

/// Result of a fallback lookup
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPrice {
    /// Substitute price, already converted to the missing column's unit
    pub price: Option<Decimal>,
    /// Column the price came from
    pub source: Option<PriceField>,
    /// Text appended to the quote description
    pub description_suffix: String,
}

impl FallbackPrice {
    fn unavailable() -> Self {
        Self {
            price: None,
            source: None,
            description_suffix: NO_PRICE_AVAILABLE.to_string(),
        }
    }
}

/// Convert a substitute amount into the unit of the missing column.
///
/// Returns the converted amount and the note describing the conversion.
fn convert_unit(
    amount: Decimal,
    from: RateUnit,
    to: RateUnit,
) -> Result<(Decimal, &'static str), CostOverflow> {
    match (from, to) {
        (RateUnit::Week, RateUnit::Month) => amount
            .checked_mul(WEEKS_PER_MONTH_FACTOR)
            .map(|price| (price, " x 4"))
            .ok_or(CostOverflow("weekly to monthly conversion")),
        (RateUnit::Month, RateUnit::Week) => amount
            .checked_div(WEEKS_PER_MONTH_FACTOR)
            .map(|price| (price, " / 4"))
            .ok_or(CostOverflow("monthly to weekly conversion")),
        _ => Ok((amount, "")),
    }
}

/// Find a substitute price for `missing_field`.
///
/// Walks the chain in order and uses the first present value. When nothing
/// is found the price is `None` and the suffix is `"No price available"`.
/// A present value that cannot be converted is an error, never skipped.
pub fn get_fallback_price(
    record: &ProductPriceRecord,
    missing_field: PriceField,
) -> Result<FallbackPrice, CostOverflow> {
    let found = fallback_chain(missing_field)
        .iter()
        .find_map(|candidate| record.get(*candidate).map(|amount| (*candidate, amount)));
    let Some((candidate, amount)) = found else {
        return Ok(FallbackPrice::unavailable());
    };

    let (price, note) = convert_unit(amount, candidate.unit(), missing_field.unit())?;
    tracing::debug!(
        missing = missing_field.key(),
        substitute = candidate.key(),
        %price,
        "Using fallback price"
    );

    Ok(FallbackPrice {
        price: Some(price),
        source: Some(candidate),
        description_suffix: format!(" (fallback: {}{})", candidate.label(), note),
    })
}

/// A price resolved either from its own column or a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub amount: Decimal,
    pub source: PriceField,
    /// Empty when the primary column was used
    pub fallback_suffix: String,
}

impl ResolvedPrice {
    pub fn is_fallback(&self) -> bool {
        !self.fallback_suffix.is_empty()
    }
}

/// Read `field`, consulting the fallback chain when it is absent.
///
/// `Ok(None)` when neither the column nor any substitute is priced.
pub fn resolve_price(
    record: &ProductPriceRecord,
    field: PriceField,
) -> Result<Option<ResolvedPrice>, CostOverflow> {
    if let Some(amount) = record.get(field) {
        return Ok(Some(ResolvedPrice {
            amount,
            source: field,
            fallback_suffix: String::new(),
        }));
    }

    let fallback = get_fallback_price(record, field)?;
    Ok(match (fallback.price, fallback.source) {
        (Some(amount), Some(source)) => Some(ResolvedPrice {
            amount,
            source,
            fallback_suffix: fallback.description_suffix,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_a_chain() {
        for field in PriceField::ALL {
            let chain = fallback_chain(field);
            assert!(!chain.is_empty(), "{} has no fallback", field.key());
            assert!(!chain.contains(&field), "{} falls back to itself", field.key());
        }
    }

    #[test]
    fn test_28_day_falls_back_to_weekly_times_four() {
        let record = ProductPriceRecord {
            weekly_7_day: Some(dec!(250)),
            rate_2_5_month: Some(dec!(900)),
            ..Default::default()
        };

        let fallback = get_fallback_price(&record, PriceField::Rate28Day).unwrap();
        assert_eq!(fallback.price, Some(dec!(1000)));
        assert_eq!(fallback.source, Some(PriceField::Weekly7Day));
        assert_eq!(fallback.description_suffix, " (fallback: weekly rate x 4)");
    }

    #[test]
    fn test_28_day_second_candidate_same_unit() {
        let record = ProductPriceRecord {
            rate_2_5_month: Some(dec!(900)),
            ..Default::default()
        };

        let fallback = get_fallback_price(&record, PriceField::Rate28Day).unwrap();
        assert_eq!(fallback.price, Some(dec!(900)));
        assert_eq!(fallback.source, Some(PriceField::Rate2To5Month));
        assert_eq!(fallback.description_suffix, " (fallback: 2-5 month rate)");
    }

    #[test]
    fn test_weekly_falls_back_to_monthly_divided_by_four() {
        let record = ProductPriceRecord {
            rate_28_day: Some(dec!(1000)),
            ..Default::default()
        };

        let fallback = get_fallback_price(&record, PriceField::Weekly7Day).unwrap();
        assert_eq!(fallback.price, Some(dec!(250)));
        assert_eq!(fallback.description_suffix, " (fallback: 28-day rate / 4)");
    }

    #[test]
    fn test_event_standard_chain() {
        let premium = ProductPriceRecord {
            event_premium: Some(dec!(450)),
            weekly_7_day: Some(dec!(250)),
            ..Default::default()
        };
        let fallback = get_fallback_price(&premium, PriceField::EventStandard).unwrap();
        assert_eq!(fallback.price, Some(dec!(450)));
        assert_eq!(fallback.source, Some(PriceField::EventPremium));

        // Weekly stands in for an event rate without conversion
        let weekly_only = ProductPriceRecord {
            weekly_7_day: Some(dec!(250)),
            ..Default::default()
        };
        let fallback = get_fallback_price(&weekly_only, PriceField::EventStandard).unwrap();
        assert_eq!(fallback.price, Some(dec!(250)));
        assert_eq!(fallback.description_suffix, " (fallback: weekly rate)");
    }

    #[test]
    fn test_exhausted_chain() {
        let record = ProductPriceRecord {
            // Not in the event standard chain
            rate_18_plus_month: Some(dec!(700)),
            ..Default::default()
        };

        let fallback = get_fallback_price(&record, PriceField::EventStandard).unwrap();
        assert_eq!(fallback.price, None);
        assert_eq!(fallback.source, None);
        assert_eq!(fallback.description_suffix, "No price available");
    }

    #[test]
    fn test_resolve_prefers_primary() {
        let record = ProductPriceRecord {
            rate_6_plus_month: Some(dec!(800)),
            rate_2_5_month: Some(dec!(900)),
            ..Default::default()
        };

        let resolved = resolve_price(&record, PriceField::Rate6PlusMonth).unwrap().unwrap();
        assert_eq!(resolved.amount, dec!(800));
        assert!(!resolved.is_fallback());

        let resolved = resolve_price(&record, PriceField::Rate18PlusMonth).unwrap().unwrap();
        assert_eq!(resolved.amount, dec!(800));
        assert_eq!(resolved.source, PriceField::Rate6PlusMonth);
        assert!(resolved.is_fallback());

        assert!(resolve_price(&ProductPriceRecord::default(), PriceField::Weekly7Day)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_conversion_overflow_is_reported_not_skipped() {
        // Weekly is first in the 28-day chain; the 2-5 month rate must not
        // silently replace it when x 4 overflows.
        let record = ProductPriceRecord {
            weekly_7_day: Some(Decimal::MAX),
            rate_2_5_month: Some(dec!(900)),
            ..Default::default()
        };

        assert_eq!(
            get_fallback_price(&record, PriceField::Rate28Day).unwrap_err(),
            CostOverflow("weekly to monthly conversion")
        );
        assert_eq!(
            resolve_price(&record, PriceField::Rate28Day).unwrap_err(),
            CostOverflow("weekly to monthly conversion")
        );
    }
}
