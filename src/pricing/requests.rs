//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use super::models::{PricingRequest, UsageType};

/// Request to price a trailer rental
#[derive(Debug, Deserialize)]
pub struct TrailerCostRequest {
    pub sku: String,
    pub rental_days: u32,
    #[serde(default = "default_usage_type")]
    pub usage_type: UsageType,
    /// Defaults to today (UTC) when omitted
    #[serde(default)]
    pub rental_start_date: Option<NaiveDate>,
}

fn default_usage_type() -> UsageType {
    UsageType::Commercial
}

impl TrailerCostRequest {
    pub fn into_pricing_request(self, today: NaiveDate) -> PricingRequest {
        PricingRequest::new(
            self.sku,
            self.rental_days,
            self.usage_type,
            self.rental_start_date.unwrap_or(today),
        )
    }
}
