//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::TaxService;
use crate::domain::{CityData, CityVehicle, HourlyPrice, TaxRule};

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::tax::{self, TaxAppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        tax::calculate_gothenburg,
        tax::calculate_custom,
        tax::calculate_for_city,
        tax::get_city_rules,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            tax::GothenburgTaxRequest,
            tax::CustomTaxRequest,
            tax::TaxResponse,
            tax::FeeBreakdownDto,
            tax::FeeWindowDto,
            TaxRule,
            HourlyPrice,
            CityData,
            CityVehicle,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Congestion Tax", description = "Daily congestion tax for one vehicle"),
    ),
    info(
        title = "Congestion Tax API",
        version = "1.0.0",
        description = "Daily congestion tax calculation with built-in Gothenburg 2013 rules or custom city rules",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    tax_service: Arc<TaxService>,
    health_state: HealthState,
    prometheus_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let tax_routes = Router::new()
        .route("/gothenburg", post(tax::calculate_gothenburg))
        .route("/custom", post(tax::calculate_custom))
        .route("/cities/{name}", get(tax::calculate_for_city))
        .route("/cities/{name}/rules", get(tax::get_city_rules))
        .with_state(TaxAppState { tax_service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/tax", tax_routes)
        // Per-route so the metrics middleware sees `MatchedPath`
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .merge(swagger_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────
