//! Kiosk DTOs
//!
//! The response shape here is legacy-locked: existing kiosk clients parse
//! `ok` / `action` / `summary` exactly as emitted by the system this one
//! replaces.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ScanSummary;

/// A scanned QR payload posted by a kiosk
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    /// Bare token, full URL, or token buried in scanner noise
    #[validate(length(min = 1, max = 500))]
    pub token_or_url: String,
    /// Which physical kiosk performed the scan
    #[validate(length(max = 80))]
    pub kiosk_label: Option<String>,
}

/// Booking summary shown on the kiosk after a successful scan
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanSummaryDto {
    pub student: Option<String>,
    pub equipment: String,
    pub lab: String,
    pub window: String,
}

impl From<ScanSummary> for ScanSummaryDto {
    fn from(s: ScanSummary) -> Self {
        Self {
            student: s.student,
            equipment: s.equipment.unwrap_or_else(|| "—".to_string()),
            lab: s.lab.unwrap_or_else(|| "—".to_string()),
            window: s.window,
        }
    }
}

/// Scan result; `action` is `check_in` (equipment handed out) or
/// `check_out` (equipment returned)
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScanSummaryDto>,
}

impl ScanResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            action: None,
            message: message.into(),
            summary: None,
        }
    }
}
