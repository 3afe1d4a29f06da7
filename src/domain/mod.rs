pub mod fee;
pub mod tax_rule;
pub mod vehicle;

// Re-export commonly used types
pub use fee::{fee_breakdown, total_fee, FeeBreakdown, FeeMode, FeeWindow, BUILT_IN_MAX_DAILY_FEE};
pub use tax_rule::{
    CityData, CityRuleRepository, CityVehicle, HourlyPrice, TaxRule, DEFAULT_MAX_DAILY_FEE,
};
pub use vehicle::{Vehicle, VehicleKind};

// Re-export errors from support for convenience
pub use crate::support::errors::{DomainError, DomainResult, VehicleError};
