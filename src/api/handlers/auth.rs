//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::error_response;
use crate::api::validated_json::ValidatedJson;
use crate::auth::{create_token, hash_password, verify_password, JwtConfig};
use crate::domain::customer::NewCustomer;
use crate::domain::{DomainError, RepositoryProvider};

/// State for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
}

/// Registration request (drivers)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Alice Driver",
    "email": "alice@example.com",
    "password": "secure_password_123"
}))]
pub struct RegisterRequest {
    /// Display name (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email address (unique)
    #[validate(email)]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "email": "alice@example.com",
    "password": "secure_password_123",
    "role": "customer"
}))]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Which account table to authenticate against: `customer` or `admin`
    #[validate(length(min = 1))]
    pub role: String,
}

/// Account info returned to the client
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub username: String,
    /// `customer` or `admin`
    pub role: String,
}

/// Successful login response with a JWT bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token; pass as `Authorization: Bearer <token>`
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Register a new driver account
///
/// A username is derived from the email local part. Passwords are stored
/// as bcrypt hashes.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Email or username already exists"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), (StatusCode, Json<ApiResponse<()>>)> {
    let password_hash = hash_password(&request.password).map_err(|e| {
        error_response(DomainError::Database(format!("bcrypt failure: {}", e)))
    })?;

    let local_part = request.email.split('@').next().unwrap_or("driver");
    let username = format!("{}{}", local_part, Utc::now().timestamp_millis() % 1000);

    let customer = state
        .repos
        .customers()
        .create(NewCustomer {
            username,
            password_hash,
            name: request.name,
            email: request.email,
        })
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            UserInfo {
                id: customer.id,
                name: customer.name,
                email: customer.email,
                username: customer.username,
                role: "customer".to_string(),
            },
            "User registered successfully",
        )),
    ))
}

/// Log in as a customer or admin
///
/// Returns a JWT token on success. The same response is sent for unknown
/// accounts and wrong passwords.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid email or password")),
        )
    };

    let (id, name, email, username, password_hash, role) = match request.role.as_str() {
        "admin" => {
            let admin = state
                .repos
                .admins()
                .find_by_email(&request.email)
                .await
                .map_err(error_response)?
                .ok_or_else(invalid)?;
            (
                admin.id,
                admin.name,
                admin.email,
                admin.username,
                admin.password_hash,
                "admin",
            )
        }
        _ => {
            let customer = state
                .repos
                .customers()
                .find_by_email(&request.email)
                .await
                .map_err(error_response)?
                .ok_or_else(invalid)?;
            (
                customer.id,
                customer.name,
                customer.email,
                customer.username,
                customer.password_hash,
                "customer",
            )
        }
    };

    let password_valid = verify_password(&request.password, &password_hash).unwrap_or(false);
    if !password_valid {
        return Err(invalid());
    }

    let token = create_token(id, &name, role, &state.jwt_config)
        .map_err(|e| error_response(DomainError::Database(e.to_string())))?;

    Ok(Json(ApiResponse::success_with_message(
        LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_config.expiration_hours * 3600,
            user: UserInfo {
                id,
                name,
                email,
                username,
                role: role.to_string(),
            },
        },
        "Login successful",
    )))
}
