//! Kiosk HTTP handlers
//!
//! Unauthenticated by design: kiosks are dumb scanning clients. Every
//! guard lives behind the token itself.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::application::services::KioskService;
use crate::domain::{DomainError, ScanOutcome};
use crate::interfaces::http::common::ValidatedJson;

use super::dto::{ScanRequest, ScanResponse, ScanSummaryDto};

/// Application state for kiosk handlers.
#[derive(Clone)]
pub struct KioskAppState {
    pub kiosk: Arc<KioskService>,
}

#[utoipa::path(
    post,
    path = "/kiosk/scan",
    tag = "Kiosk",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan accepted, booking transitioned", body = ScanResponse),
        (status = 422, description = "Invalid, expired or ineligible token", body = ScanResponse),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn scan(
    State(state): State<KioskAppState>,
    ValidatedJson(request): ValidatedJson<ScanRequest>,
) -> Result<Json<ScanResponse>, (StatusCode, Json<ScanResponse>)> {
    match state
        .kiosk
        .scan(&request.token_or_url, request.kiosk_label.as_deref())
        .await
    {
        Ok(ScanOutcome::Completed(transition)) => Ok(Json(ScanResponse {
            ok: true,
            action: Some(transition.action.label().to_string()),
            message: transition.action.message().to_string(),
            summary: Some(ScanSummaryDto::from(transition.summary)),
        })),
        Ok(ScanOutcome::Rejected(rejection)) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ScanResponse::failure(rejection.message())),
        )),
        Err(DomainError::Database(e)) => {
            error!(error = %e, "Scan processing failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanResponse::failure("Internal error processing scan.")),
            ))
        }
        Err(e) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ScanResponse::failure(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/kiosk/scan-url/{token}",
    tag = "Kiosk",
    params(("token" = String, Path, description = "Token embedded in a QR-encoded URL")),
    responses(
        (status = 200, description = "Echo for QR codes that encode a URL")
    )
)]
pub async fn scan_url(Path(token): Path<String>) -> String {
    // QR codes may encode a URL; scanners hitting it get a trivial echo
    // while the kiosk client extracts the token and POSTs it to /kiosk/scan.
    format!("OK: token={token}")
}
