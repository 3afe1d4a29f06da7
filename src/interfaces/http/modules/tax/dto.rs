//! Tax API DTOs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::TaxOutcome;
use crate::domain::{FeeBreakdown, TaxRule};

/// Upper bound on crossings accepted in one request
pub const MAX_DATES_PER_REQUEST: u64 = 10_000;

/// Crossings priced with the built-in Gothenburg rules.
///
/// Unknown fields (e.g. `tax_rules`, `iscustomdata`) are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GothenburgTaxRequest {
    /// Vehicle type: `Car`, `Bus`, `Motorbike`, `Military`, `Diplomat`, `Emergency` or `Foreign`
    #[serde(rename = "type", default)]
    #[schema(example = "Car")]
    pub vehicle_type: String,
    #[serde(rename = "licenseplate", alias = "license_plate", default)]
    #[schema(example = "ABC123")]
    pub license_plate: String,
    /// RFC 3339 timestamps of one day's crossings
    #[serde(default)]
    #[validate(length(max = 10000, message = "at most 10000 dates per request"))]
    #[schema(value_type = Vec<String>, example = json!(["2013-02-08T06:27:00+01:00"]))]
    pub dates: Vec<DateTime<FixedOffset>>,
}

/// Crossings priced with a caller-supplied rule set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomTaxRequest {
    #[serde(rename = "type", default)]
    #[schema(example = "Car")]
    pub vehicle_type: String,
    #[serde(rename = "licenseplate", alias = "license_plate", default)]
    #[schema(example = "ABC123")]
    pub license_plate: String,
    #[serde(default)]
    #[validate(length(max = 10000, message = "at most 10000 dates per request"))]
    #[schema(value_type = Vec<String>)]
    pub dates: Vec<DateTime<FixedOffset>>,
    #[serde(default)]
    #[validate(nested)]
    pub tax_rules: TaxRule,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxResponse {
    pub vehicle_type: String,
    pub license_plate: String,
    /// Set when the vehicle and rules came from a city file
    pub city: Option<String>,
    pub custom_rules: bool,
    pub total_fee: u32,
    pub max_daily_fee: u32,
    pub breakdown: FeeBreakdownDto,
}

/// Serialized [`FeeBreakdown`]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdownDto {
    pub windows: Vec<FeeWindowDto>,
    pub uncapped_total: u32,
    pub capped: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeWindowDto {
    /// First crossing of the window
    pub start: String,
    pub crossings: usize,
    pub fee: u32,
}

impl From<FeeBreakdown> for FeeBreakdownDto {
    fn from(b: FeeBreakdown) -> Self {
        let capped = b.is_capped();
        Self {
            windows: b
                .windows
                .into_iter()
                .map(|w| FeeWindowDto {
                    start: w.start.to_rfc3339(),
                    crossings: w.crossings,
                    fee: w.fee,
                })
                .collect(),
            uncapped_total: b.uncapped_total,
            capped,
        }
    }
}

impl From<TaxOutcome> for TaxResponse {
    fn from(outcome: TaxOutcome) -> Self {
        Self {
            vehicle_type: outcome.vehicle.kind().to_string(),
            license_plate: outcome.vehicle.license_plate().to_string(),
            city: outcome.city,
            custom_rules: outcome.custom_rules,
            total_fee: outcome.breakdown.total,
            max_daily_fee: outcome.breakdown.max_daily_fee,
            breakdown: outcome.breakdown.into(),
        }
    }
}
