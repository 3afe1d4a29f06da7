//! Health check handler

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::CityCache;

#[derive(Clone)]
pub struct HealthState {
    pub started_at: Arc<Instant>,
    pub cities_dir: PathBuf,
    /// Present when city rule caching is enabled
    pub city_cache: Option<Arc<CityCache>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub city_rules: ComponentHealth,
    pub cached_cities: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// Built-in calculations never depend on the city directory, so a missing
/// directory only degrades the city endpoints and the service stays 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let city_rules = match tokio::fs::metadata(&state.cities_dir).await {
        Ok(meta) if meta.is_dir() => ComponentHealth {
            status: "ok".to_string(),
            detail: None,
        },
        Ok(_) => ComponentHealth {
            status: "unavailable".to_string(),
            detail: Some(format!("{} is not a directory", state.cities_dir.display())),
        },
        Err(e) => ComponentHealth {
            status: "unavailable".to_string(),
            detail: Some(format!("{}: {}", state.cities_dir.display(), e)),
        },
    };

    let status = if city_rules.status == "ok" { "ok" } else { "degraded" };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            city_rules,
            cached_cities: state.city_cache.as_ref().map(|cache| cache.len()),
        }),
    )
}
