//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ApiResponse, PaginatedResponse};
use crate::api::handlers::{admin, auth, health, operator, payments, reservations, stations};
use crate::application::services::{BookingService, PaymentService};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::domain::RepositoryProvider;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        // Stations
        stations::list_stations,
        stations::get_station,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::cancel_reservation,
        // Admin
        admin::get_stats,
        admin::list_reservations,
        admin::reservation_suggestions,
        admin::set_reservation_status,
        admin::my_stations,
        // Payments
        payments::list_payments,
        payments::get_payment,
        payments::set_payment_status,
        payments::refund_payment,
        // Operator
        operator::list_stations,
        operator::create_station,
        operator::update_station,
        operator::delete_station,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<admin::AdminReservationDto>,
            // Health
            health::HealthStatus,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Stations
            stations::StationDto,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::BookingSummaryDto,
            reservations::ReservationDto,
            // Admin
            admin::DashboardStatsDto,
            admin::AdminReservationDto,
            admin::SuggestionDto,
            admin::UpdateReservationStatusRequest,
            admin::StationRefDto,
            // Payments
            payments::PaymentDto,
            payments::PaymentDetailDto,
            payments::UpdatePaymentStatusRequest,
            // Operator
            operator::CreateStationRequest,
            operator::UpdateStationRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe for uptime monitoring."),
        (name = "Authentication", description = "Customer registration and customer/admin login. The JWT is returned in `token` and passed as `Authorization: Bearer <token>`."),
        (name = "Stations", description = "Public station map and search: name search, connector type and availability filters."),
        (name = "Reservations", description = "Customer booking flow. Creating a reservation claims one slot inside a locking transaction; cancellation is allowed until five minutes past the start time."),
        (name = "Admin", description = "Fleet dashboard: aggregate stats, the reservation table with filters, and unconditional status overrides."),
        (name = "Payments", description = "Admin payment management. A refund cascades into reservation cancellation and slot release; refunding twice is refused."),
        (name = "Operator", description = "Station CRUD for operators. Capacity edits clamp the free-slot counter under the same lock the booking flow takes."),
    ),
    info(
        title = "EV Charging Booking API",
        version = "1.0.0",
        description = "REST API for locating EV charging stations and booking charging slots.

## Response format

Every response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"message\": \"...\"}
```

On failure:
```json
{\"success\": false, \"error\": \"description\"}
```

## Authentication

Obtain a token via `POST /api/v1/auth/login` and pass it in the
`Authorization: Bearer <token>` header. Admin and operator endpoints
require the `admin` role.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    booking: Arc<BookingService>,
    payment_service: Arc<PaymentService>,
    jwt_config: JwtConfig,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth::AuthHandlerState {
            repos: repos.clone(),
            jwt_config,
        });

    // Station routes (public)
    let station_routes = Router::new()
        .route("/", get(stations::list_stations))
        .route("/{id}", get(stations::get_station))
        .with_state(stations::StationHandlerState {
            repos: repos.clone(),
        });

    // Reservation routes (authenticated)
    let reservation_routes = Router::new()
        .route(
            "/",
            post(reservations::create_reservation).get(reservations::list_reservations),
        )
        .route("/{id}/cancel", put(reservations::cancel_reservation))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(reservations::ReservationHandlerState {
            repos: repos.clone(),
            booking: booking.clone(),
        });

    // Admin routes (authenticated, admin role)
    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route("/reservations", get(admin::list_reservations))
        .route(
            "/reservations/suggestions",
            get(admin::reservation_suggestions),
        )
        .route(
            "/reservations/{id}/status",
            put(admin::set_reservation_status),
        )
        .route("/my-stations", get(admin::my_stations))
        .with_state(admin::AdminHandlerState {
            repos: repos.clone(),
            booking,
        });

    // Payment routes (authenticated, admin role)
    let payment_routes = Router::new()
        .route("/", get(payments::list_payments))
        .route("/{id}", get(payments::get_payment))
        .route("/{id}/status", put(payments::set_payment_status))
        .route("/{id}/refund", post(payments::refund_payment))
        .with_state(payments::PaymentHandlerState {
            repos: repos.clone(),
            payments: payment_service,
        });

    // Operator routes (authenticated, admin role)
    let operator_routes = Router::new()
        .route(
            "/stations",
            get(operator::list_stations).post(operator::create_station),
        )
        .route(
            "/stations/{id}",
            put(operator::update_station).delete(operator::delete_station),
        )
        .with_state(operator::OperatorHandlerState { repos });

    // Admin-only subtree shares one middleware stack.
    let admin_tree = Router::new()
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/admin/payments", payment_routes)
        .nest("/api/v1/operator", operator_routes)
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/stations", station_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .merge(admin_tree)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
