//! REST API handlers

pub mod admin;
pub mod auth;
pub mod health;
pub mod operator;
pub mod payments;
pub mod reservations;
pub mod stations;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::reservation::AdminScope;
use crate::domain::DomainError;

/// Map a domain error to its HTTP status and response envelope.
///
/// Business-rule violations surface as 409, validation as 400, missing
/// entities as 404. Raw storage errors are logged but never leaked.
pub(crate) fn error_response(err: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match &err {
        DomainError::Validation(_) | DomainError::Temporal(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_)
        | DomainError::Capacity(_)
        | DomainError::AlreadyCancelled(_)
        | DomainError::AlreadyRefunded(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Internal server error")),
            );
        }
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

/// Parse the `admin_id` query value: `"all"` for the whole fleet, otherwise
/// a numeric admin ID.
pub(crate) fn parse_admin_scope(raw: &str) -> Result<AdminScope, (StatusCode, Json<ApiResponse<()>>)> {
    if raw == "all" {
        return Ok(AdminScope::All);
    }
    raw.parse::<i32>().map(AdminScope::Admin).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid admin_id: {}", raw))),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rules_map_to_409() {
        let (status, _) = error_response(DomainError::Capacity("full".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(DomainError::AlreadyCancelled(1));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(DomainError::AlreadyRefunded(1));
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn lookup_failures_map_to_404() {
        let (status, _) = error_response(DomainError::NotFound {
            entity: "Station",
            field: "id",
            value: "9".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (status, body) = error_response(DomainError::Database("secret dsn".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn admin_scope_parsing() {
        assert_eq!(parse_admin_scope("all").unwrap(), AdminScope::All);
        assert_eq!(parse_admin_scope("4").unwrap(), AdminScope::Admin(4));
        assert!(parse_admin_scope("four").is_err());
    }
}
