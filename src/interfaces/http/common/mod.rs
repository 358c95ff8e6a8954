//! Shared HTTP response types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard response envelope for the JSON API.
///
/// Success: `{"success": true, "data": {...}}`;
/// failure: `{"success": false, "error": "description"}`.
/// The kiosk endpoint keeps its own legacy shape instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Map a domain error onto its HTTP rendering.
///
/// Conflicts and validation failures share 422 but keep their distinct
/// messages; persistence failures are logged here and surfaced generically.
pub fn domain_error_response(e: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) => {
            tracing::error!(error = %e, "Unexpected persistence failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match &e {
        DomainError::Database(_) => "Internal server error".to_string(),
        _ => e.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_not_found_render_differently() {
        let (conflict, _) =
            domain_error_response(DomainError::Conflict("already booked".into()));
        let (not_found, _) = domain_error_response(DomainError::NotFound {
            entity: "Booking",
            field: "id",
            value: "7".into(),
        });
        assert_eq!(conflict, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(not_found, StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (status, Json(body)) =
            domain_error_response(DomainError::Database("secret dsn".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
