//! Authentication middleware for Axum
//!
//! Verifies the bearer token minted by the campus identity provider,
//! resolves the user row and their role set, and injects an [`Actor`]
//! extension for handlers. Role lookup failures fall back to "no roles".

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::application::authorization::{Actor, RoleProvider};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    UnknownUser,
}

/// Authentication state: JWT verification config plus the stores needed to
/// resolve the actor.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repos: Arc<dyn RepositoryProvider>,
    pub roles: Arc<dyn RoleProvider>,
}

fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Bearer-token authentication middleware
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

    let Some(token) = extract_bearer(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(_) => return auth_error_response(AuthError::InvalidToken),
    };
    if claims.is_expired() {
        return auth_error_response(AuthError::ExpiredToken);
    }
    let Some(user_id) = claims.user_id() else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let user = match auth_state.repos.users().find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return auth_error_response(AuthError::UnknownUser),
        Err(e) => {
            warn!(user_id, error = %e, "User lookup failed during authentication");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Internal server error")),
            )
                .into_response();
        }
    };

    // Fail-closed: lookup errors inside the provider yield an empty set
    let roles = auth_state.roles.roles_for(user.id).await;

    request
        .extensions_mut()
        .insert(Actor::new(user.id, user.name, roles));
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authorization token",
        AuthError::InvalidToken => "Invalid authorization token",
        AuthError::ExpiredToken => "Authorization token expired",
        AuthError::UnknownUser => "Unknown user",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}
