//! Catalog models for trailer pricing.
//!
//! A catalog is a read-only snapshot mapping trailer SKUs to their price
//! records. Every price cell is optional: an absent cell means "no price
//! configured for this tier", which is different from a zero-cost tier.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies one price column of a [`ProductPriceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[serde(rename = "weekly_7_day")]
    Weekly7Day,
    #[serde(rename = "rate_28_day")]
    Rate28Day,
    #[serde(rename = "rate_2_5_month")]
    Rate2To5Month,
    #[serde(rename = "rate_6_plus_month")]
    Rate6PlusMonth,
    #[serde(rename = "rate_18_plus_month")]
    Rate18PlusMonth,
    EventStandard,
    EventPremium,
    EventPremiumPlus,
    EventPremiumPlatinum,
}

/// The billing unit a price column is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnit {
    /// Flat price for a short event rental.
    Event,
    /// Price per 7 days.
    Week,
    /// Price per month (the 28-day rate counts as a month).
    Month,
}

impl PriceField {
    pub const ALL: [PriceField; 9] = [
        PriceField::Weekly7Day,
        PriceField::Rate28Day,
        PriceField::Rate2To5Month,
        PriceField::Rate6PlusMonth,
        PriceField::Rate18PlusMonth,
        PriceField::EventStandard,
        PriceField::EventPremium,
        PriceField::EventPremiumPlus,
        PriceField::EventPremiumPlatinum,
    ];

    /// Catalog column name
    pub fn key(self) -> &'static str {
        match self {
            PriceField::Weekly7Day => "weekly_7_day",
            PriceField::Rate28Day => "rate_28_day",
            PriceField::Rate2To5Month => "rate_2_5_month",
            PriceField::Rate6PlusMonth => "rate_6_plus_month",
            PriceField::Rate18PlusMonth => "rate_18_plus_month",
            PriceField::EventStandard => "event_standard",
            PriceField::EventPremium => "event_premium",
            PriceField::EventPremiumPlus => "event_premium_plus",
            PriceField::EventPremiumPlatinum => "event_premium_platinum",
        }
    }

    /// Human-readable name used in quote descriptions
    pub fn label(self) -> &'static str {
        match self {
            PriceField::Weekly7Day => "weekly rate",
            PriceField::Rate28Day => "28-day rate",
            PriceField::Rate2To5Month => "2-5 month rate",
            PriceField::Rate6PlusMonth => "6+ month rate",
            PriceField::Rate18PlusMonth => "18+ month rate",
            PriceField::EventStandard => "event standard rate",
            PriceField::EventPremium => "event premium rate",
            PriceField::EventPremiumPlus => "event premium plus rate",
            PriceField::EventPremiumPlatinum => "event premium platinum rate",
        }
    }

    pub fn unit(self) -> RateUnit {
        match self {
            PriceField::Weekly7Day => RateUnit::Week,
            PriceField::Rate28Day
            | PriceField::Rate2To5Month
            | PriceField::Rate6PlusMonth
            | PriceField::Rate18PlusMonth => RateUnit::Month,
            PriceField::EventStandard
            | PriceField::EventPremium
            | PriceField::EventPremiumPlus
            | PriceField::EventPremiumPlatinum => RateUnit::Event,
        }
    }
}

/// Price record for a single trailer SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceRecord {
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub weekly_7_day: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub rate_28_day: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub rate_2_5_month: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub rate_6_plus_month: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub rate_18_plus_month: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub event_standard: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub event_premium: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub event_premium_plus: Option<Decimal>,
    #[serde(default, with = "price_cell", skip_serializing_if = "Option::is_none")]
    pub event_premium_platinum: Option<Decimal>,
}

impl ProductPriceRecord {
    /// Read a price column
    pub fn get(&self, field: PriceField) -> Option<Decimal> {
        match field {
            PriceField::Weekly7Day => self.weekly_7_day,
            PriceField::Rate28Day => self.rate_28_day,
            PriceField::Rate2To5Month => self.rate_2_5_month,
            PriceField::Rate6PlusMonth => self.rate_6_plus_month,
            PriceField::Rate18PlusMonth => self.rate_18_plus_month,
            PriceField::EventStandard => self.event_standard,
            PriceField::EventPremium => self.event_premium,
            PriceField::EventPremiumPlus => self.event_premium_plus,
            PriceField::EventPremiumPlatinum => self.event_premium_platinum,
        }
    }

    /// Builder-style setter, mostly for fixtures
    pub fn with(mut self, field: PriceField, amount: Decimal) -> Self {
        let slot = match field {
            PriceField::Weekly7Day => &mut self.weekly_7_day,
            PriceField::Rate28Day => &mut self.rate_28_day,
            PriceField::Rate2To5Month => &mut self.rate_2_5_month,
            PriceField::Rate6PlusMonth => &mut self.rate_6_plus_month,
            PriceField::Rate18PlusMonth => &mut self.rate_18_plus_month,
            PriceField::EventStandard => &mut self.event_standard,
            PriceField::EventPremium => &mut self.event_premium,
            PriceField::EventPremiumPlus => &mut self.event_premium_plus,
            PriceField::EventPremiumPlatinum => &mut self.event_premium_platinum,
        };
        *slot = Some(amount);
        self
    }
}

/// Errors raised while loading catalog or seasonal data
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only mapping from trailer SKU to price record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: HashMap<String, ProductPriceRecord>,
}

impl Catalog {
    pub fn new(products: HashMap<String, ProductPriceRecord>) -> Self {
        Self { products }
    }

    /// Parse a catalog from its JSON export
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog snapshot from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn get(&self, sku: &str) -> Option<&ProductPriceRecord> {
        self.products.get(sku)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// How the trailer will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Event,
    Commercial,
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageType::Event => write!(f, "event"),
            UsageType::Commercial => write!(f, "commercial"),
        }
    }
}

/// A single trailer line item to price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRequest {
    pub sku: String,
    pub rental_days: u32,
    pub usage_type: UsageType,
    pub rental_start_date: NaiveDate,
}

impl PricingRequest {
    pub fn new(
        sku: impl Into<String>,
        rental_days: u32,
        usage_type: UsageType,
        rental_start_date: NaiveDate,
    ) -> Self {
        Self {
            sku: sku.into(),
            rental_days,
            usage_type,
            rental_start_date,
        }
    }
}

/// Pricing strategies, in the order the orchestrator may try them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Flat event rate for rentals of up to four days
    Event,
    /// Long-term monthly tier prorated to the day
    MonthlyTier,
    /// 28-day rate prorated fractionally
    #[serde(rename = "period_28_day")]
    Period28Day,
    /// Weekly rate billed in whole weeks
    Weekly,
}

impl std::fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PricingStrategy::Event => "event",
            PricingStrategy::MonthlyTier => "monthly_tier",
            PricingStrategy::Period28Day => "period_28_day",
            PricingStrategy::Weekly => "weekly",
        };
        f.write_str(name)
    }
}

/// Base cost produced by one strategy, before the seasonal multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyQuote {
    pub strategy: PricingStrategy,
    pub base_cost: Decimal,
    pub description: String,
}

/// Serde adapter for catalog price cells.
///
/// Accepts numbers, numeric strings (spreadsheet exports may carry `$` and
/// thousands separators), `null` and `""`. Serializes amounts as strings.
mod price_cell {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::str_option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        super::parse_price_cell(raw.as_ref()).map_err(serde::de::Error::custom)
    }
}

/// Remove thousands separators from a numeric string.
///
/// Commas are accepted only between three-digit groups of the integer part
/// (`1,250.00`, `12,000`); anything else (`1,2`, `1,,000`, `1.000,5`) is
/// `None`.
fn strip_thousands_separators(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let digits = integer
        .strip_prefix(|c: char| c == '-' || c == '+')
        .unwrap_or(integer);
    let is_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    let mut groups = digits.split(',');
    let leading = groups.next()?;
    if !(1..=3).contains(&leading.len()) || !is_digits(leading) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && is_digits(group)) {
        return None;
    }

    Some(text.replace(',', ""))
}

/// Parse a raw catalog cell into an optional price.
pub fn parse_price_cell(value: Option<&serde_json::Value>) -> Result<Option<Decimal>, String> {
    let text = match value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
            strip_thousands_separators(unsigned)
                .ok_or_else(|| format!("price cell is not numeric: {:?}", s))?
        }
        Some(other) => return Err(format!("price cell is not numeric: {}", other)),
    };

    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| format!("price cell is not numeric: {:?}", text))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("price cell is negative: {}", amount));
    }

    Ok(Some(amount))
}
