//! Congestion tax REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, warn};

use super::dto::{CustomTaxRequest, GothenburgTaxRequest, TaxResponse};
use crate::application::{TaxRequest, TaxService};
use crate::domain::{CityData, DomainError};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::support::errors::AppError;

#[derive(Clone)]
pub struct TaxAppState {
    pub tax_service: Arc<TaxService>,
}

type ApiError = (StatusCode, Json<ApiResponse<()>>);

fn error_response(err: AppError) -> ApiError {
    let status = match &err {
        AppError::Domain(DomainError::InvalidVehicle(_)) => StatusCode::BAD_REQUEST,
        AppError::Domain(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
        AppError::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
        AppError::Infra(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %err, "Tax request failed");
    } else {
        warn!(error = %err, "Tax request rejected");
    }

    (status, Json(ApiResponse::error(err.to_string())))
}

#[utoipa::path(
    post,
    path = "/api/v1/tax/gothenburg",
    tag = "Congestion Tax",
    request_body = GothenburgTaxRequest,
    responses(
        (status = 200, description = "Daily fee", body = ApiResponse<TaxResponse>),
        (status = 400, description = "Invalid vehicle or malformed JSON"),
        (status = 422, description = "Too many dates")
    )
)]
pub async fn calculate_gothenburg(
    State(state): State<TaxAppState>,
    ValidatedJson(req): ValidatedJson<GothenburgTaxRequest>,
) -> Result<Json<ApiResponse<TaxResponse>>, ApiError> {
    let request = TaxRequest::built_in(req.vehicle_type, req.license_plate, req.dates);
    let outcome = state
        .tax_service
        .calculate(&request)
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/tax/custom",
    tag = "Congestion Tax",
    request_body = CustomTaxRequest,
    responses(
        (status = 200, description = "Daily fee under the supplied rules", body = ApiResponse<TaxResponse>),
        (status = 400, description = "Invalid vehicle or malformed JSON"),
        (status = 422, description = "Rule values out of range or too many dates")
    )
)]
pub async fn calculate_custom(
    State(state): State<TaxAppState>,
    ValidatedJson(req): ValidatedJson<CustomTaxRequest>,
) -> Result<Json<ApiResponse<TaxResponse>>, ApiError> {
    let request = TaxRequest::custom(req.vehicle_type, req.license_plate, req.dates, req.tax_rules);
    let outcome = state
        .tax_service
        .calculate(&request)
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tax/cities/{name}",
    tag = "Congestion Tax",
    params(("name" = String, Path, description = "City name, case-insensitive")),
    responses(
        (status = 200, description = "Daily fee for the vehicle stored in the city file", body = ApiResponse<TaxResponse>),
        (status = 400, description = "Invalid city name or invalid vehicle in the city file"),
        (status = 404, description = "Unknown city"),
        (status = 500, description = "Unreadable city file")
    )
)]
pub async fn calculate_for_city(
    State(state): State<TaxAppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<TaxResponse>>, ApiError> {
    let outcome = state
        .tax_service
        .calculate_for_city(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tax/cities/{name}/rules",
    tag = "Congestion Tax",
    params(("name" = String, Path, description = "City name, case-insensitive")),
    responses(
        (status = 200, description = "Raw city rule file", body = ApiResponse<CityData>),
        (status = 404, description = "Unknown city")
    )
)]
pub async fn get_city_rules(
    State(state): State<TaxAppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<CityData>>, ApiError> {
    let data = state
        .tax_service
        .city_rules(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(data)))
}
