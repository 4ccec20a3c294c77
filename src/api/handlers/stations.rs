//! Public station listing handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::handlers::error_response;
use crate::domain::station::{Station, StationFilter};
use crate::domain::{DomainError, RepositoryProvider};

/// State for public station handlers
#[derive(Clone)]
pub struct StationHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Filters accepted by the station listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StationListQuery {
    /// Substring match on the station name
    pub search: Option<String>,
    /// Connector type, e.g. `CCS2`; `All Types` disables the filter
    #[serde(rename = "type")]
    pub connector_type: Option<String>,
    /// `true` to hide full stations
    pub available: Option<bool>,
}

/// Station as shown on the map and in listings
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: i32,
    pub name: String,
    /// "lat, lng" display string
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub connector_type: String,
    pub charging_watt: i32,
    pub status: String,
    pub price: Decimal,
    pub total_slots: i32,
    pub available_slots: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
    pub average_wait_time: i32,
}

impl From<Station> for StationDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            address: format!("{}, {}", s.latitude, s.longitude),
            name: s.name,
            lat: s.latitude,
            lng: s.longitude,
            connector_type: s.connector_type,
            charging_watt: s.charging_watt,
            status: s.status.to_string(),
            price: s.price_per_kwh,
            total_slots: s.total_slots,
            available_slots: s.available_slots,
            description: s.description,
            operating_hours: s.operating_hours,
            average_wait_time: s.average_wait_time,
        }
    }
}

/// List stations with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(StationListQuery),
    responses(
        (status = 200, description = "Station list", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_stations(
    State(state): State<StationHandlerState>,
    Query(query): Query<StationListQuery>,
) -> Result<Json<ApiResponse<Vec<StationDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = StationFilter {
        search: query.search.filter(|s| !s.is_empty()),
        connector_type: query
            .connector_type
            .filter(|t| !t.is_empty() && t.as_str() != "All Types"),
        only_available: query.available.unwrap_or(false),
    };

    let stations = state
        .repos
        .stations()
        .list(&filter)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(Into::into).collect(),
    )))
}

/// Get a single station
#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn get_station(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let station = state
        .repos
        .stations()
        .find_by_id(id)
        .await
        .map_err(error_response)?;

    let Some(station) = station else {
        return Err(error_response(DomainError::NotFound {
            entity: "Station",
            field: "id",
            value: id.to_string(),
        }));
    };
    Ok(Json(ApiResponse::success(station.into())))
}
