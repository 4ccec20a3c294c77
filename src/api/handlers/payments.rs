//! Admin payment handlers

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
use crate::api::handlers::{error_response, parse_admin_scope};
use crate::application::services::PaymentService;
use crate::domain::payment::{Payment, PaymentRow, PaymentStatus};
use crate::domain::RepositoryProvider;

use super::admin::AdminScopeQuery;

/// State for payment handlers
#[derive(Clone)]
pub struct PaymentHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub payments: Arc<PaymentService>,
}

/// Payment as shown in the admin table
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub reservation_id: i32,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub created_at: String,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            reservation_id: p.reservation_id,
            amount: p.amount,
            method: p.method,
            status: p.status.to_string(),
            created_at: p.payment_date.to_rfc3339(),
        }
    }
}

/// Payment detail including the payer
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDetailDto {
    #[serde(flatten)]
    pub payment: PaymentDto,
    pub user_id: i32,
    pub user_name: String,
}

impl From<PaymentRow> for PaymentDetailDto {
    fn from(row: PaymentRow) -> Self {
        Self {
            payment: row.payment.into(),
            user_id: row.customer_id,
            user_name: row.customer_name,
        }
    }
}

/// Payment status update
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"status": "Success"}))]
pub struct UpdatePaymentStatusRequest {
    /// `Pending`, `Success`, `Failed` or `Refunded`
    pub status: String,
}

fn parse_payment_status(
    raw: &str,
) -> Result<PaymentStatus, (StatusCode, Json<ApiResponse<()>>)> {
    match raw {
        "Pending" => Ok(PaymentStatus::Pending),
        "Success" => Ok(PaymentStatus::Success),
        "Failed" => Ok(PaymentStatus::Failed),
        "Refunded" => Ok(PaymentStatus::Refunded),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid status: {}", other))),
        )),
    }
}

/// List payments visible to an admin scope
#[utoipa::path(
    get,
    path = "/api/v1/admin/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(AdminScopeQuery),
    responses(
        (status = 200, description = "Payment list", body = ApiResponse<Vec<PaymentDto>>)
    )
)]
pub async fn list_payments(
    State(state): State<PaymentHandlerState>,
    Query(query): Query<AdminScopeQuery>,
) -> Result<Json<ApiResponse<Vec<PaymentDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let scope = parse_admin_scope(&query.admin_id)?;
    let payments = state
        .repos
        .payments()
        .list_for_admin(scope)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        payments.into_iter().map(Into::into).collect(),
    )))
}

/// Payment detail
#[utoipa::path(
    get,
    path = "/api/v1/admin/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment detail", body = ApiResponse<PaymentDetailDto>),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    State(state): State<PaymentHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentDetailDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let detail = state
        .repos
        .payments()
        .find_detail(id)
        .await
        .map_err(error_response)?;

    let Some(detail) = detail else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Payment {} not found", id))),
        ));
    };
    Ok(Json(ApiResponse::success(detail.into())))
}

/// Update a payment status field
///
/// A plain field update with no side effects; use the refund endpoint for
/// the cancellation cascade.
#[utoipa::path(
    put,
    path = "/api/v1/admin/payments/{id}/status",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn set_payment_status(
    State(state): State<PaymentHandlerState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<ApiResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_payment_status(&request.status)?;

    let updated = state
        .repos
        .payments()
        .set_status(id, status)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success_with_message(
        updated.into(),
        "Status updated successfully",
    )))
}

/// Refund a payment
///
/// Marks the payment Refunded, cancels the reservation and releases the
/// station slot in one transaction. Refunding twice is refused with 409.
#[utoipa::path(
    post,
    path = "/api/v1/admin/payments/{id}/refund",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Refund processed", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment already refunded")
    )
)]
pub async fn refund_payment(
    State(state): State<PaymentHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let refunded = state.payments.refund(id).await.map_err(error_response)?;

    Ok(Json(ApiResponse::success_with_message(
        refunded.into(),
        "Refund processed successfully and reservation cancelled.",
    )))
}
