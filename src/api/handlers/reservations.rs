//! Customer reservation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::error_response;
use crate::api::validated_json::ValidatedJson;
use crate::application::services::{BookingConfirmation, BookingRequest, BookingService};
use crate::application::CancelActor;
use crate::domain::reservation::BookingRow;
use crate::domain::RepositoryProvider;

/// State for reservation handlers
#[derive(Clone)]
pub struct ReservationHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub booking: Arc<BookingService>,
}

/// New booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "customer_id": 7,
    "station_id": 3,
    "date": "2026-09-01",
    "time_slot": "14:00",
    "duration": 2,
    "payment_method": "Card"
}))]
pub struct CreateReservationRequest {
    #[validate(range(min = 1))]
    pub customer_id: i32,
    #[validate(range(min = 1))]
    pub station_id: i32,
    /// Booking date, `YYYY-MM-DD`
    #[validate(length(min = 1))]
    pub date: String,
    /// Start of the slot, `HH:MM`
    #[validate(length(min = 1))]
    pub time_slot: String,
    /// Duration in whole hours
    #[validate(range(min = 1, max = 24))]
    pub duration: i32,
    /// Defaults to `Card`
    pub payment_method: Option<String>,
}

/// Booking summary returned after creation
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingSummaryDto {
    pub id: i32,
    pub station_id: i32,
    pub station_name: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub estimated_kwh: i32,
    pub total_price: Decimal,
    pub slot_number: i32,
    pub status: String,
}

impl From<BookingConfirmation> for BookingSummaryDto {
    fn from(c: BookingConfirmation) -> Self {
        Self {
            id: c.reservation_id,
            station_id: c.station_id,
            station_name: c.station_name,
            date: c.start_time.format("%Y-%m-%d").to_string(),
            time: c.start_time.format("%H:%M").to_string(),
            duration: c.duration_hours,
            estimated_kwh: c.estimated_kwh,
            total_price: c.total_price,
            slot_number: c.slot_number,
            status: c.status.to_string(),
        }
    }
}

/// One row of the customer's booking list
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub station_id: i32,
    pub station_name: String,
    /// "lat, lng" display string
    pub address: String,
    pub date: String,
    pub time: String,
    pub duration: i64,
    pub total_price: Decimal,
    pub slot_number: i32,
    pub status: String,
}

impl From<BookingRow> for ReservationDto {
    fn from(row: BookingRow) -> Self {
        let r = row.reservation;
        Self {
            id: r.id,
            station_id: r.station_id,
            station_name: row.station_name,
            address: format!("{}, {}", row.station_latitude, row.station_longitude),
            date: r.start_time.format("%Y-%m-%d").to_string(),
            time: r.start_time.format("%H:%M").to_string(),
            duration: (r.end_time - r.start_time).num_hours(),
            total_price: r.total_price,
            slot_number: r.slot_number,
            status: r.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ReservationListQuery {
    pub customer_id: i32,
}

/// Create a reservation
///
/// Claims one slot at the station inside a locking transaction and creates
/// the backing payment. Fails with 409 when the station is full.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<BookingSummaryDto>),
        (status = 400, description = "Malformed date, time, or a start in the past"),
        (status = 404, description = "Station or customer not found"),
        (status = 409, description = "No slots available")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingSummaryDto>>), (StatusCode, Json<ApiResponse<()>>)>
{
    let bad_request = |msg: String| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg)));

    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .map_err(|e| bad_request(format!("Invalid date: {}", e)))?;
    let time_slot = NaiveTime::parse_from_str(&request.time_slot, "%H:%M")
        .map_err(|e| bad_request(format!("Invalid time_slot: {}", e)))?;

    let confirmation = state
        .booking
        .create_reservation(BookingRequest {
            customer_id: request.customer_id,
            station_id: request.station_id,
            date,
            time_slot,
            duration_hours: request.duration,
            payment_method: request.payment_method.unwrap_or_else(|| "Card".to_string()),
        })
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            confirmation.into(),
            "Reservation created successfully",
        )),
    ))
}

/// List a customer's reservations, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Reservation list", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationHandlerState>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let rows = state
        .repos
        .reservations()
        .list_for_customer(query.customer_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}

/// Cancel a reservation (customer path)
///
/// Allowed until five minutes past the start time; afterwards only an
/// admin can cancel.
#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<String>),
        (status = 400, description = "Cancellation window closed"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Already cancelled")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .booking
        .cancel_reservation(id, CancelActor::Customer)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::message("Reservation cancelled successfully")))
}
