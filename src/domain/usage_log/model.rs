//! Usage log domain entity

use chrono::{DateTime, Utc};
use serde_json::json;

/// Append-only record of one physical possession window.
///
/// Created by the scan that hands equipment out; the same row is later
/// closed by the scan that takes it back. Never deleted by the scan flow.
#[derive(Debug, Clone)]
pub struct UsageLog {
    pub id: i64,
    pub booking_id: i64,
    pub user_id: i64,
    pub lab_id: Option<i64>,
    pub equipment_id: Option<i64>,
    /// When possession began
    pub checked_in_at: Option<DateTime<Utc>>,
    /// When possession ended; None while the log is open
    pub checked_out_at: Option<DateTime<Utc>>,
    pub kiosk_label: Option<String>,
    /// Free-form key/value context, e.g. `{"source": "qr"}`
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UsageLog {
    /// Open a possession window for a booking at the given instant.
    pub fn open_for_booking(
        booking_id: i64,
        user_id: i64,
        lab_id: Option<i64>,
        equipment_id: Option<i64>,
        kiosk_label: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            booking_id,
            user_id,
            lab_id,
            equipment_id,
            checked_in_at: Some(at),
            checked_out_at: None,
            kiosk_label: Some(kiosk_label.to_string()),
            meta: Some(json!({ "source": "qr" })),
            created_at: at,
            updated_at: at,
        }
    }

    /// Open ⇔ possession began and has not ended.
    pub fn is_open(&self) -> bool {
        self.checked_in_at.is_some() && self.checked_out_at.is_none()
    }

    /// End the possession window.
    pub fn close(&mut self, at: DateTime<Utc>) {
        self.checked_out_at = Some(at);
        self.updated_at = at;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_log_is_open() {
        let log = UsageLog::open_for_booking(1, 2, Some(3), Some(4), "Tablet Kiosk", Utc::now());
        assert!(log.is_open());
        assert_eq!(log.meta, Some(json!({ "source": "qr" })));
        assert_eq!(log.kiosk_label.as_deref(), Some("Tablet Kiosk"));
    }

    #[test]
    fn closed_log_is_not_open() {
        let mut log = UsageLog::open_for_booking(1, 2, None, None, "Front Desk", Utc::now());
        log.close(Utc::now());
        assert!(!log.is_open());
        assert!(log.checked_out_at.is_some());
    }
}
