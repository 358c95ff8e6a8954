//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{BookingDetails, QrToken};

/// Display format used across booking views, e.g. `Mar 10, 2:00 PM`
fn short_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%b %d, %-I:%M %p").to_string()
}

/// Request to create a new booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Lab to book in
    pub lab_id: i64,
    /// Specific equipment unit; omit for "any equipment in this lab"
    pub equipment_id: Option<i64>,
    #[validate(length(max = 120))]
    pub title: Option<String>,
    /// Window start (ISO 8601)
    pub starts_at: String,
    /// Window end (ISO 8601), must be after `starts_at`
    pub ends_at: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Direct status edit (approval authority only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    /// One of: pending, confirmed, checked_out, returned, cancelled
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

/// Calendar feed window
#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarParams {
    /// Only bookings starting at or after this instant (ISO 8601)
    pub start: Option<String>,
    /// Only bookings starting at or before this instant (ISO 8601)
    pub end: Option<String>,
}

/// Availability query
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    pub lab_id: i64,
    pub starts_at: String,
    pub ends_at: String,
}

/// QR issuance options
#[derive(Debug, Deserialize, IntoParams)]
pub struct IssueQrParams {
    /// Token lifetime in minutes; defaults to 15
    pub ttl_minutes: Option<i64>,
}

/// One calendar event
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingEventDto {
    pub id: i64,
    pub title: String,
    pub start: String,
    pub end: String,
    pub status: String,
    pub lab: Option<String>,
    pub equipment: Option<String>,
    pub user_id: i64,
    pub user: Option<String>,
}

impl From<BookingDetails> for BookingEventDto {
    fn from(d: BookingDetails) -> Self {
        let title = d
            .equipment_name
            .clone()
            .or_else(|| d.booking.title.clone())
            .unwrap_or_else(|| "Booking".to_string());
        Self {
            id: d.booking.id,
            title,
            start: d.booking.starts_at.to_rfc3339(),
            end: d.booking.ends_at.to_rfc3339(),
            status: d.booking.status.to_string(),
            lab: d.lab_name,
            equipment: d.equipment_name,
            user_id: d.booking.user_id,
            user: d.user_name,
        }
    }
}

/// Booking detail view
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub starts_at: String,
    pub ends_at: String,
    pub lab: Option<String>,
    pub equipment: Option<String>,
    pub user: Option<String>,
    pub notes: Option<String>,
    /// QR issuance allowed only for confirmed/checked-out bookings
    pub can_issue_qr: bool,
}

impl From<BookingDetails> for BookingDto {
    fn from(d: BookingDetails) -> Self {
        let title = d
            .equipment_name
            .clone()
            .or_else(|| d.booking.title.clone())
            .unwrap_or_else(|| "Booking".to_string());
        Self {
            id: d.booking.id,
            title,
            status: d.booking.status.to_string(),
            starts_at: short_stamp(d.booking.starts_at),
            ends_at: short_stamp(d.booking.ends_at),
            lab: d.lab_name,
            equipment: d.equipment_name,
            user: d.user_name,
            notes: d.booking.notes,
            can_issue_qr: d.booking.status.is_scannable(),
        }
    }
}

/// One row in the approvals queue
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingApprovalDto {
    pub id: i64,
    pub user: Option<String>,
    pub lab: Option<String>,
    pub equipment: String,
    pub starts_at: String,
    pub ends_at: String,
    pub title: Option<String>,
}

impl From<BookingDetails> for PendingApprovalDto {
    fn from(d: BookingDetails) -> Self {
        Self {
            id: d.booking.id,
            user: d.user_name,
            lab: d.lab_name,
            equipment: d.equipment_name.unwrap_or_else(|| "—".to_string()),
            starts_at: short_stamp(d.booking.starts_at),
            ends_at: short_stamp(d.booking.ends_at),
            title: d.booking.title,
        }
    }
}

/// Response from creating a booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking_id: i64,
}

/// Response from a status-changing operation
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingStatusResponse {
    pub booking_id: i64,
    pub status: String,
}

/// Issued (or fetched) QR token
#[derive(Debug, Serialize, ToSchema)]
pub struct QrTokenDto {
    pub token: String,
    /// Scan-url fallback endpoint encoding this token
    pub url: String,
    pub expires_at: String,
}

impl QrTokenDto {
    pub fn from_token(token: &QrToken, public_base_url: &str) -> Self {
        Self {
            token: token.token.clone(),
            url: format!(
                "{}/kiosk/scan-url/{}",
                public_base_url.trim_end_matches('/'),
                token.token
            ),
            expires_at: token.expires_at.to_rfc3339(),
        }
    }
}

/// Equipment ids blocked for the requested window
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub unavailable: Vec<i64>,
}
