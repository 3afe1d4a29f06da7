//! City rule repository interface

use async_trait::async_trait;

use super::model::CityData;
use crate::support::errors::AppResult;

#[async_trait]
pub trait CityRuleRepository: Send + Sync {
    /// Load the rule file of `city`. Unknown cities yield `DomainError::NotFound`.
    async fn find_by_name(&self, city: &str) -> AppResult<CityData>;
}
