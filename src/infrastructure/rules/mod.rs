//! City rule loading: JSON files on disk with an optional in-memory cache

pub mod cache;
pub mod file_repository;

pub use cache::{CachedCityRuleRepository, CityCache};
pub use file_repository::FileCityRuleRepository;
