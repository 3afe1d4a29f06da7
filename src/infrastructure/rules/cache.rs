//! In-memory city rule cache

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::{CityData, CityRuleRepository};
use crate::support::errors::AppResult;

/// Concurrent map of parsed city files keyed by lowercased city name
#[derive(Default)]
pub struct CityCache {
    entries: DashMap<String, CityData>,
}

impl CityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, city: &str) -> Option<CityData> {
        self.entries
            .get(&city.to_ascii_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, city: &str, data: CityData) {
        self.entries.insert(city.to_ascii_lowercase(), data);
    }

    pub fn invalidate(&self, city: &str) -> bool {
        self.entries.remove(&city.to_ascii_lowercase()).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serves repeated lookups from a [`CityCache`] instead of the inner repository.
///
/// Failed lookups are not cached.
pub struct CachedCityRuleRepository {
    inner: Arc<dyn CityRuleRepository>,
    cache: Arc<CityCache>,
}

impl CachedCityRuleRepository {
    pub fn new(inner: Arc<dyn CityRuleRepository>, cache: Arc<CityCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<CityCache> {
        &self.cache
    }
}

#[async_trait]
impl CityRuleRepository for CachedCityRuleRepository {
    async fn find_by_name(&self, city: &str) -> AppResult<CityData> {
        if let Some(data) = self.cache.get(city) {
            debug!(city, "City rules served from cache");
            return Ok(data);
        }

        let data = self.inner.find_by_name(city).await?;
        self.cache.insert(city, data.clone());
        Ok(data)
    }
}

// ── Tests ──────────────────────────────────────────────────────
