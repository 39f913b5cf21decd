//! Seasonal rate multipliers.
//!
//! The engine only sees a [`SeasonalResolver`]: a multiplier and a
//! description for a rental start date. [`SeasonalConfig`] is the
//! configuration-file backed resolver used by the service.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::models::CatalogError;

/// Multiplier and description for a rental start date
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalRate {
    pub multiplier: f64,
    pub description: String,
}

/// Resolves the seasonal multiplier for a rental.
///
/// Implementations are expected to return a positive multiplier; the pricing
/// engine rejects anything else.
pub trait SeasonalResolver: Send + Sync {
    fn determine_seasonal_multiplier(&self, start_date: NaiveDate) -> SeasonalRate;
}

/// Calendar day without a year, written `MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // Validate against a leap year so 02-29 is accepted
        NaiveDate::from_ymd_opt(2024, month, day)?;
        Some(Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected MM-DD, got {:?}", s))?;
        let month: u32 = month.parse().map_err(|_| format!("invalid month in {:?}", s))?;
        let day: u32 = day.parse().map_err(|_| format!("invalid day in {:?}", s))?;
        MonthDay::new(month, day).ok_or_else(|| format!("no such calendar day: {:?}", s))
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A named date range with its own rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    pub rate: f64,
    /// First day of the season, inclusive
    pub start: MonthDay,
    /// Last day of the season, inclusive; before `start` when the season
    /// wraps the year end
    pub end: MonthDay,
}

impl Season {
    pub fn contains(&self, day: MonthDay) -> bool {
        if self.start <= self.end {
            self.start <= day && day <= self.end
        } else {
            day >= self.start || day <= self.end
        }
    }
}

fn default_standard_rate() -> f64 {
    1.0
}

fn default_standard_description() -> String {
    "Standard rates".to_string()
}

/// Seasonal pricing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    #[serde(default = "default_standard_rate")]
    pub standard_rate: f64,
    #[serde(default = "default_standard_description")]
    pub standard_description: String,
    /// Checked in order; the first matching season wins
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            standard_rate: default_standard_rate(),
            standard_description: default_standard_description(),
            seasons: Vec::new(),
        }
    }
}

impl SeasonalConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Render a multiplier with at least two decimal places: `1.00`, `1.25`,
/// `1.125`. Values with no decimal form (NaN, infinities) print as-is.
fn format_rate(rate: f64) -> String {
    match Decimal::from_str(&rate.to_string()) {
        Ok(mut rate) => {
            if rate.scale() < 2 {
                rate.rescale(2);
            }
            rate.to_string()
        }
        Err(_) => rate.to_string(),
    }
}

impl SeasonalResolver for SeasonalConfig {
    fn determine_seasonal_multiplier(&self, start_date: NaiveDate) -> SeasonalRate {
        let day = MonthDay::of(start_date);

        match self.seasons.iter().find(|season| season.contains(day)) {
            Some(season) => SeasonalRate {
                multiplier: season.rate,
                description: format!("{} pricing (x{})", season.name, format_rate(season.rate)),
            },
            None => SeasonalRate {
                multiplier: self.standard_rate,
                description: self.standard_description.clone(),
            },
        }
    }
}

/// Resolver that always returns the same rate
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSeasonalRate(pub SeasonalRate);

impl FixedSeasonalRate {
    pub fn new(multiplier: f64, description: impl Into<String>) -> Self {
        Self(SeasonalRate {
            multiplier,
            description: description.into(),
        })
    }
}

impl SeasonalResolver for FixedSeasonalRate {
    fn determine_seasonal_multiplier(&self, _start_date: NaiveDate) -> SeasonalRate {
        self.0.clone()
    }
}
