//! City rule files on disk
//!
//! Each city lives in `<cities_dir>/<lowercased name>.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use validator::Validate;

use crate::domain::{CityData, CityRuleRepository, DomainError};
use crate::support::errors::{AppResult, InfraError};

pub struct FileCityRuleRepository {
    cities_dir: PathBuf,
}

impl FileCityRuleRepository {
    pub fn new(cities_dir: impl Into<PathBuf>) -> Self {
        Self {
            cities_dir: cities_dir.into(),
        }
    }

    pub fn cities_dir(&self) -> &Path {
        &self.cities_dir
    }

    /// Path of the rule file for `city`; rejects names that could leave `cities_dir`.
    pub fn path_for(&self, city: &str) -> Result<PathBuf, DomainError> {
        let valid = !city.is_empty()
            && city
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::Validation(format!(
                "invalid city name: {:?}",
                city
            )));
        }
        Ok(self
            .cities_dir
            .join(format!("{}.json", city.to_ascii_lowercase())))
    }
}

#[async_trait]
impl CityRuleRepository for FileCityRuleRepository {
    async fn find_by_name(&self, city: &str) -> AppResult<CityData> {
        let path = self.path_for(city)?;
        debug!(path = %path.display(), "Reading city rule file");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::NotFound {
                    entity: "City",
                    field: "name",
                    value: city.to_string(),
                }
                .into());
            }
            Err(e) => return Err(InfraError::Io(e).into()),
        };

        let city_data: CityData = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Malformed city rule file");
            InfraError::Serialization(e)
        })?;

        city_data
            .tax_rules
            .validate()
            .map_err(|e| DomainError::Validation(format!("{}: {}", city, e)))?;

        Ok(city_data)
    }
}

// ── Tests ──────────────────────────────────────────────────────
