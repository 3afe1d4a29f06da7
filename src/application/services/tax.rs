//! Tax service: turns requests into daily fee calculations

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::domain::{
    fee_breakdown, CityData, CityRuleRepository, DomainResult, FeeBreakdown, FeeMode, TaxRule,
    Vehicle,
};
use crate::support::errors::AppResult;

/// One day of crossings for one vehicle
#[derive(Debug, Clone)]
pub struct TaxRequest {
    pub vehicle_type: String,
    pub license_plate: String,
    pub crossings: Vec<DateTime<FixedOffset>>,
    /// `None` selects the built-in rules
    pub rules: Option<TaxRule>,
}

impl TaxRequest {
    pub fn built_in(
        vehicle_type: impl Into<String>,
        license_plate: impl Into<String>,
        crossings: Vec<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            vehicle_type: vehicle_type.into(),
            license_plate: license_plate.into(),
            crossings,
            rules: None,
        }
    }

    pub fn custom(
        vehicle_type: impl Into<String>,
        license_plate: impl Into<String>,
        crossings: Vec<DateTime<FixedOffset>>,
        rules: TaxRule,
    ) -> Self {
        Self {
            rules: Some(rules),
            ..Self::built_in(vehicle_type, license_plate, crossings)
        }
    }

    pub fn mode(&self) -> FeeMode<'_> {
        match &self.rules {
            Some(rules) => FeeMode::Custom(rules),
            None => FeeMode::BuiltIn,
        }
    }
}

/// Result of a calculation
#[derive(Debug, Clone)]
pub struct TaxOutcome {
    pub vehicle: Vehicle,
    pub city: Option<String>,
    pub custom_rules: bool,
    pub breakdown: FeeBreakdown,
}

impl TaxOutcome {
    pub fn total_fee(&self) -> u32 {
        self.breakdown.total
    }
}

/// Service for congestion tax calculations
pub struct TaxService {
    cities: Arc<dyn CityRuleRepository>,
}

impl TaxService {
    pub fn new(cities: Arc<dyn CityRuleRepository>) -> Self {
        Self { cities }
    }

    /// Validate the vehicle, then price the crossings.
    pub fn calculate(&self, request: &TaxRequest) -> DomainResult<TaxOutcome> {
        let vehicle = Vehicle::new(&request.vehicle_type, request.license_plate.as_str())?;
        let mode = request.mode();
        let breakdown = fee_breakdown(&vehicle, &request.crossings, mode);

        let mode_label = if mode.is_custom() { "custom" } else { "built_in" };
        metrics::counter!("congestion_tax_calculations_total", "mode" => mode_label).increment(1);
        metrics::histogram!("congestion_tax_daily_fee", "mode" => mode_label)
            .record(breakdown.total as f64);

        info!(
            vehicle_type = %vehicle.kind(),
            license_plate = vehicle.license_plate(),
            crossings = request.crossings.len(),
            windows = breakdown.windows.len(),
            total_fee = breakdown.total,
            capped = breakdown.is_capped(),
            mode = mode_label,
            "Congestion tax calculated"
        );

        Ok(TaxOutcome {
            vehicle,
            city: None,
            custom_rules: mode.is_custom(),
            breakdown,
        })
    }

    /// Price the vehicle and crossings stored in a city rule file with that city's rules.
    pub async fn calculate_for_city(&self, city: &str) -> AppResult<TaxOutcome> {
        let data = self.cities.find_by_name(city).await?;
        let request = TaxRequest::custom(
            data.vehicle.vehicle_type,
            data.vehicle.license_plate,
            data.vehicle.times,
            data.tax_rules,
        );

        let mut outcome = self.calculate(&request)?;
        outcome.city = Some(data.city_name);
        Ok(outcome)
    }

    pub async fn city_rules(&self, city: &str) -> AppResult<CityData> {
        self.cities.find_by_name(city).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
