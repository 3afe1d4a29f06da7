//! Infrastructure layer - external concerns

pub mod rules;

pub use rules::{CachedCityRuleRepository, CityCache, FileCityRuleRepository};
