//! Admin dashboard handlers: stats, reservation table, status overrides

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::{ApiResponse, PaginatedResponse};
use crate::api::handlers::{error_response, parse_admin_scope};
use crate::application::services::BookingService;
use crate::domain::reservation::{
    AdminReservationRow, ReservationFilter, ReservationStatus, Suggestion,
};
use crate::domain::RepositoryProvider;

/// State for admin handlers
#[derive(Clone)]
pub struct AdminHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub booking: Arc<BookingService>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AdminScopeQuery {
    /// `all` or a numeric admin ID
    pub admin_id: String,
}

/// Dashboard aggregate figures
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_reservations: u64,
    pub pending_approvals: u64,
    pub total_revenue: Decimal,
    /// Revenue over the last 24 hours
    pub daily_revenue: Decimal,
    pub active_stations: u64,
}

/// One row of the admin reservation table
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReservationDto {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub station_id: i32,
    pub station_name: String,
    pub start: String,
    pub end: String,
    pub total: Decimal,
    pub slot: i32,
    pub status: String,
}

impl From<AdminReservationRow> for AdminReservationDto {
    fn from(row: AdminReservationRow) -> Self {
        let r = row.reservation;
        Self {
            id: r.id,
            user_id: r.customer_id,
            user_name: row.customer_name,
            station_id: r.station_id,
            station_name: row.station_name,
            start: r.start_time.to_rfc3339(),
            end: r.end_time.to_rfc3339(),
            total: r.total_price,
            slot: r.slot_number,
            status: r.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AdminReservationQuery {
    /// `all` or a numeric admin ID
    pub admin_id: String,
    /// Status filter; `All statuses` disables it
    pub status: Option<String>,
    pub station_id: Option<i32>,
    /// Substring match on customer or station name
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SuggestionQuery {
    /// `all` or a numeric admin ID
    pub admin_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionDto {
    pub suggestion: String,
    /// `User` or `Station`
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<Suggestion> for SuggestionDto {
    fn from(s: Suggestion) -> Self {
        Self {
            suggestion: s.suggestion,
            kind: s.kind.to_string(),
        }
    }
}

/// Admin reservation status override
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"status": "Cancelled"}))]
pub struct UpdateReservationStatusRequest {
    /// `Pending`, `Confirmed` or `Cancelled`
    pub status: String,
}

/// Reference to a station, for filter dropdowns
#[derive(Debug, Serialize, ToSchema)]
pub struct StationRefDto {
    pub id: i32,
    pub name: String,
}

fn parse_reservation_status(
    raw: &str,
) -> Result<ReservationStatus, (StatusCode, Json<ApiResponse<()>>)> {
    match raw {
        "Pending" => Ok(ReservationStatus::Pending),
        "Confirmed" => Ok(ReservationStatus::Confirmed),
        "Cancelled" => Ok(ReservationStatus::Cancelled),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid status: {}", other))),
        )),
    }
}

/// Dashboard stats
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminScopeQuery),
    responses(
        (status = 200, description = "Aggregate figures", body = ApiResponse<DashboardStatsDto>)
    )
)]
pub async fn get_stats(
    State(state): State<AdminHandlerState>,
    Query(query): Query<AdminScopeQuery>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let scope = parse_admin_scope(&query.admin_id)?;
    let stats = state
        .repos
        .reservations()
        .dashboard_stats(scope, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(DashboardStatsDto {
        total_reservations: stats.total_reservations,
        pending_approvals: stats.pending_approvals,
        total_revenue: stats.total_revenue,
        daily_revenue: stats.daily_revenue,
        active_stations: stats.active_stations,
    })))
}

/// Admin reservation table with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminReservationQuery),
    responses(
        (status = 200, description = "Reservation page",
         body = ApiResponse<PaginatedResponse<AdminReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<AdminHandlerState>,
    Query(query): Query<AdminReservationQuery>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<AdminReservationDto>>>,
    (StatusCode, Json<ApiResponse<()>>),
> {
    let scope = parse_admin_scope(&query.admin_id)?;

    let status = match query.status.as_deref() {
        None | Some("All statuses") | Some("") => None,
        Some(raw) => Some(parse_reservation_status(raw)?),
    };
    let filter = ReservationFilter {
        status,
        station_id: query.station_id,
        search: query.search.filter(|s| !s.is_empty()),
    };

    let page = state
        .repos
        .reservations()
        .list_for_admin(scope, &filter, query.page, query.limit)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        page.rows.into_iter().map(Into::into).collect(),
        page.total,
        query.page,
        query.limit,
    ))))
}

/// Search suggestions for the reservation filter box
#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations/suggestions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(SuggestionQuery),
    responses(
        (status = 200, description = "Matching customer and station names",
         body = ApiResponse<Vec<SuggestionDto>>)
    )
)]
pub async fn reservation_suggestions(
    State(state): State<AdminHandlerState>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<ApiResponse<Vec<SuggestionDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let Some(search) = query.search.filter(|s| !s.is_empty()) else {
        return Ok(Json(ApiResponse::success(Vec::new())));
    };
    let scope = parse_admin_scope(query.admin_id.as_deref().unwrap_or("all"))?;

    let suggestions = state
        .repos
        .reservations()
        .suggestions(scope, &search)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        suggestions.into_iter().map(Into::into).collect(),
    )))
}

/// Override a reservation status
///
/// Moving into Cancelled releases the station slot; any other transition
/// leaves the counters alone.
#[utoipa::path(
    put,
    path = "/api/v1/admin/reservations/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<String>),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn set_reservation_status(
    State(state): State<AdminHandlerState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateReservationStatusRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_reservation_status(&request.status)?;

    state
        .booking
        .admin_set_status(id, status)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::message(format!(
        "Reservation marked as {}",
        status
    ))))
}

/// Stations owned by an admin, for filter dropdowns
#[utoipa::path(
    get,
    path = "/api/v1/admin/my-stations",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminScopeQuery),
    responses(
        (status = 200, description = "Station references", body = ApiResponse<Vec<StationRefDto>>)
    )
)]
pub async fn my_stations(
    State(state): State<AdminHandlerState>,
    Query(query): Query<AdminScopeQuery>,
) -> Result<Json<ApiResponse<Vec<StationRefDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    use crate::domain::reservation::AdminScope;
    use crate::domain::station::StationFilter;

    let scope = parse_admin_scope(&query.admin_id)?;
    let stations = match scope {
        AdminScope::All => state
            .repos
            .stations()
            .list(&StationFilter::default())
            .await
            .map_err(error_response)?,
        AdminScope::Admin(admin_id) => state
            .repos
            .stations()
            .list_for_admin(admin_id)
            .await
            .map_err(error_response)?,
    };

    Ok(Json(ApiResponse::success(
        stations
            .into_iter()
            .map(|s| StationRefDto {
                id: s.id,
                name: s.name,
            })
            .collect(),
    )))
}
