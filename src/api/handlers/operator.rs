//! Operator station CRUD handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::error_response;
use crate::api::handlers::stations::StationDto;
use crate::api::validated_json::ValidatedJson;
use crate::domain::station::{Station, StationStatus};
use crate::domain::{DomainError, RepositoryProvider};

/// State for operator handlers
#[derive(Clone)]
pub struct OperatorHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct OperatorStationQuery {
    pub admin_id: i32,
}

/// New station
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "admin_id": 1,
    "station_name": "Central Plaza",
    "latitude": 13.7563,
    "longitude": 100.5018,
    "connector_type": "CCS2",
    "charging_watt": 50000,
    "total_slots": 4,
    "price_per_kwh": "7.00"
}))]
pub struct CreateStationRequest {
    #[validate(range(min = 1))]
    pub admin_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub station_name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1, max = 50))]
    pub connector_type: String,
    #[validate(range(min = 1))]
    pub charging_watt: i32,
    #[validate(range(min = 1, max = 100))]
    pub total_slots: i32,
    pub price_per_kwh: Decimal,
    /// `Available`, `Busy` or `Maintenance`; defaults to `Available`
    pub status: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<String>,
    pub average_wait_time: Option<i32>,
}

/// Station edit. Shrinking `total_slots` clamps the free-slot counter.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 200))]
    pub station_name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1, max = 50))]
    pub connector_type: String,
    #[validate(range(min = 1))]
    pub charging_watt: i32,
    #[validate(range(min = 1, max = 100))]
    pub total_slots: i32,
    pub price_per_kwh: Decimal,
    pub status: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<String>,
    pub average_wait_time: Option<i32>,
}

fn parse_station_status(
    raw: Option<&str>,
) -> Result<StationStatus, (StatusCode, Json<ApiResponse<()>>)> {
    match raw {
        None | Some("Available") => Ok(StationStatus::Available),
        Some("Busy") => Ok(StationStatus::Busy),
        Some("Maintenance") => Ok(StationStatus::Maintenance),
        Some(other) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid status: {}", other))),
        )),
    }
}

/// List an operator's stations
#[utoipa::path(
    get,
    path = "/api/v1/operator/stations",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(OperatorStationQuery),
    responses(
        (status = 200, description = "Stations owned by the admin", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_stations(
    State(state): State<OperatorHandlerState>,
    Query(query): Query<OperatorStationQuery>,
) -> Result<Json<ApiResponse<Vec<StationDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let stations = state
        .repos
        .stations()
        .list_for_admin(query.admin_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(Into::into).collect(),
    )))
}

/// Create a station
///
/// The free-slot counter starts at full capacity.
#[utoipa::path(
    post,
    path = "/api/v1/operator/stations",
    tag = "Operator",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_station(
    State(state): State<OperatorHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_station_status(request.status.as_deref())?;

    let station = Station {
        id: 0,
        admin_id: request.admin_id,
        name: request.station_name,
        latitude: request.latitude,
        longitude: request.longitude,
        connector_type: request.connector_type,
        charging_watt: request.charging_watt,
        total_slots: request.total_slots,
        available_slots: request.total_slots,
        price_per_kwh: request.price_per_kwh,
        status,
        description: request.description,
        operating_hours: request.operating_hours,
        average_wait_time: request.average_wait_time.unwrap_or(0),
    };

    let created = state
        .repos
        .stations()
        .create(station)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

/// Update a station
#[utoipa::path(
    put,
    path = "/api/v1/operator/stations/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn update_station(
    State(state): State<OperatorHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_station_status(request.status.as_deref())?;

    let existing = state
        .repos
        .stations()
        .find_by_id(id)
        .await
        .map_err(error_response)?;
    let Some(existing) = existing else {
        return Err(error_response(DomainError::NotFound {
            entity: "Station",
            field: "id",
            value: id.to_string(),
        }));
    };

    let updated = Station {
        id: existing.id,
        admin_id: existing.admin_id,
        name: request.station_name,
        latitude: request.latitude,
        longitude: request.longitude,
        connector_type: request.connector_type,
        charging_watt: request.charging_watt,
        total_slots: request.total_slots,
        available_slots: existing.available_slots,
        price_per_kwh: request.price_per_kwh,
        status,
        description: request.description.or(existing.description),
        operating_hours: request.operating_hours.or(existing.operating_hours),
        average_wait_time: request
            .average_wait_time
            .unwrap_or(existing.average_wait_time),
    };

    let saved = state
        .repos
        .stations()
        .update(updated)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(saved.into())))
}

/// Delete a station and, by cascade, its reservations
#[utoipa::path(
    delete,
    path = "/api/v1/operator/stations/{id}",
    tag = "Operator",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station deleted", body = ApiResponse<String>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn delete_station(
    State(state): State<OperatorHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .repos
        .stations()
        .delete(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::message("Station deleted successfully")))
}
