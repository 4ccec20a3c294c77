//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{verify_token, AuthError, Claims, JwtConfig};

/// Authentication state for the JWT middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated account extracted from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub account_id: i32,
    pub name: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            account_id: claims.sub.parse().unwrap_or(0),
            name: claims.name,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware - requires valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }

            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);

            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Admin-only middleware - must be layered after `auth_middleware`
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

/// Create an authentication error response
fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };

    let body = Json(json!({
        "success": false,
        "error": error.to_string()
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::auth::jwt::create_token;

    fn protected_app(jwt_config: JwtConfig) -> Router {
        let admin_routes = Router::new()
            .route("/admin", get(|| async { "admin ok" }))
            .layer(axum::middleware::from_fn(admin_middleware));

        Router::new()
            .route("/me", get(|| async { "ok" }))
            .merge(admin_routes)
            .layer(axum::middleware::from_fn_with_state(
                AuthState {
                    jwt_config: jwt_config.clone(),
                },
                auth_middleware,
            ))
    }

    fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = protected_app(JwtConfig::default());
        let resp = app.oneshot(get_request("/me", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes() {
        let config = JwtConfig::default();
        let token = create_token(1, "Driver", "customer", &config).unwrap();
        let app = protected_app(config);

        let resp = app
            .oneshot(get_request("/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn customer_cannot_reach_admin_route() {
        let config = JwtConfig::default();
        let token = create_token(1, "Driver", "customer", &config).unwrap();
        let app = protected_app(config);

        let resp = app
            .oneshot(get_request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_reaches_admin_route() {
        let config = JwtConfig::default();
        let token = create_token(1, "Operator", "admin", &config).unwrap();
        let app = protected_app(config);

        let resp = app
            .oneshot(get_request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
