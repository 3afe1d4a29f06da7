//! Tax rule aggregate
//!
//! Custom rule sets, city rule files and the repository that loads them.

pub mod model;
pub mod repository;

pub use model::{CityData, CityVehicle, HourlyPrice, TaxRule, DEFAULT_MAX_DAILY_FEE};
pub use repository::CityRuleRepository;
