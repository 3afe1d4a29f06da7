//! Vehicle domain entity

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::support::errors::VehicleError;

/// Closed set of vehicle kinds known to the tax rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum VehicleKind {
    Car,
    Bus,
    Motorbike,
    Military,
    Diplomat,
    Emergency,
    Foreign,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 7] = [
        Self::Car,
        Self::Bus,
        Self::Motorbike,
        Self::Military,
        Self::Diplomat,
        Self::Emergency,
        Self::Foreign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Bus => "Bus",
            Self::Motorbike => "Motorbike",
            Self::Military => "Military",
            Self::Diplomat => "Diplomat",
            Self::Emergency => "Emergency",
            Self::Foreign => "Foreign",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Only ordinary cars pay congestion tax.
    pub fn is_tax_exempt(&self) -> bool {
        !matches!(self, Self::Car)
    }
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle passing the toll points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    kind: VehicleKind,
    license_plate: String,
}

impl Vehicle {
    /// Build a vehicle from its type tag and license plate.
    ///
    /// Fails for type tags outside [`VehicleKind`] (matched case-sensitively,
    /// e.g. `"Car"`) and for empty plates.
    pub fn new(vehicle_type: &str, license_plate: impl Into<String>) -> Result<Self, VehicleError> {
        let kind = VehicleKind::from_str(vehicle_type)
            .ok_or_else(|| VehicleError::UnknownType(vehicle_type.to_string()))?;
        Self::with_kind(kind, license_plate)
    }

    pub fn with_kind(kind: VehicleKind, license_plate: impl Into<String>) -> Result<Self, VehicleError> {
        let license_plate = license_plate.into();
        if license_plate.is_empty() {
            return Err(VehicleError::InvalidLicensePlate(kind.to_string()));
        }
        Ok(Self { kind, license_plate })
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    pub fn is_tax_exempt(&self) -> bool {
        self.kind.is_tax_exempt()
    }

    pub fn has_valid_license_plate(&self) -> bool {
        !self.license_plate.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_is_taxable() {
        let car = Vehicle::new("Car", "ABC123").unwrap();
        assert_eq!(car.kind(), VehicleKind::Car);
        assert!(!car.is_tax_exempt());
        assert!(car.has_valid_license_plate());
    }

    #[test]
    fn every_other_kind_is_exempt() {
        for kind in VehicleKind::ALL.into_iter().filter(|k| *k != VehicleKind::Car) {
            let vehicle = Vehicle::new(kind.as_str(), "XYZ789").unwrap();
            assert!(vehicle.is_tax_exempt(), "{kind} should be exempt");
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(
            Vehicle::new("Spaceship", "ABC123"),
            Err(VehicleError::UnknownType("Spaceship".into()))
        );
        assert_eq!(
            Vehicle::new("", "ABC123"),
            Err(VehicleError::UnknownType(String::new()))
        );
    }

    #[test]
    fn type_tags_are_case_sensitive() {
        assert!(Vehicle::new("car", "ABC123").is_err());
    }

    #[test]
    fn empty_license_plate_is_rejected() {
        assert_eq!(
            Vehicle::new("Bus", ""),
            Err(VehicleError::InvalidLicensePlate("Bus".into()))
        );
    }

    #[test]
    fn unknown_type_wins_over_empty_plate() {
        assert!(matches!(
            Vehicle::new("Tractor", ""),
            Err(VehicleError::UnknownType(_))
        ));
    }

    #[test]
    fn kind_display_round_trips_through_from_str() {
        for kind in VehicleKind::ALL {
            assert_eq!(VehicleKind::from_str(&kind.to_string()), Some(kind));
        }
    }
}
