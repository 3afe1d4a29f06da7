//! Custom congestion tax rule set

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Daily cap applied when a rule set does not define its own
pub const DEFAULT_MAX_DAILY_FEE: u32 = 60;

/// Price band covering whole hours `start_hour..=end_hour`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct HourlyPrice {
    #[validate(range(max = 23, message = "start_hour must be within 0..=23"))]
    pub start_hour: u32,
    #[validate(range(max = 23, message = "end_hour must be within 0..=23"))]
    pub end_hour: u32,
    pub rate: u32,
}

impl HourlyPrice {
    pub fn covers(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }
}

/// Caller-supplied rule set for custom mode.
///
/// Every field is optional in JSON. A missing or zero `max_taxed_fee`
/// falls back to [`DEFAULT_MAX_DAILY_FEE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct TaxRule {
    #[validate(nested)]
    pub hourly_prices: Vec<HourlyPrice>,
    pub tax_on_weekend: bool,
    #[validate(custom(function = "validate_months"))]
    pub excluded_months: Vec<u32>,
    pub max_taxed_fee: u32,
    #[serde(deserialize_with = "deserialize_dates")]
    #[schema(value_type = Vec<String>, example = json!(["2013-05-01"]))]
    pub excluded_dates: Vec<NaiveDate>,
    #[validate(custom(function = "validate_days"))]
    pub excluded_days: Vec<u32>,
    /// Parsed and echoed back; no crossing is ever charged this price.
    pub default_hourly_price: u32,
}

impl TaxRule {
    pub fn max_daily_fee(&self) -> u32 {
        if self.max_taxed_fee == 0 {
            DEFAULT_MAX_DAILY_FEE
        } else {
            self.max_taxed_fee
        }
    }

    /// Rate of the first band covering `hour`, in the order supplied.
    pub fn rate_for_hour(&self, hour: u32) -> Option<u32> {
        self.hourly_prices
            .iter()
            .find(|band| band.covers(hour))
            .map(|band| band.rate)
    }
}

fn validate_months(months: &Vec<u32>) -> Result<(), ValidationError> {
    if months.iter().all(|m| (1..=12).contains(m)) {
        Ok(())
    } else {
        Err(ValidationError::new("month").with_message("excluded_months must be within 1..=12".into()))
    }
}

fn validate_days(days: &Vec<u32>) -> Result<(), ValidationError> {
    if days.iter().all(|d| (1..=31).contains(d)) {
        Ok(())
    } else {
        Err(ValidationError::new("day").with_message("excluded_days must be within 1..=31".into()))
    }
}

/// Accepts plain dates (`2013-05-01`) and full RFC 3339 timestamps.
fn deserialize_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_date(s).map_err(serde::de::Error::custom))
        .collect()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.date_naive())
        .map_err(|e| format!("invalid date {s:?}: {e}"))
}

/// Vehicle section of a city rule file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityVehicle {
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub license_plate: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub times: Vec<DateTime<FixedOffset>>,
}

/// Contents of a city rule file: the rules plus the crossings to price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityData {
    pub city_name: String,
    pub vehicle: CityVehicle,
    #[serde(default)]
    pub tax_rules: TaxRule,
}

// ── Tests ──────────────────────────────────────────────────────
