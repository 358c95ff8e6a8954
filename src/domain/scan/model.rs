//! Kiosk scan outcome types

use chrono::{DateTime, Utc};

use crate::domain::booking::Booking;

/// What a successful scan did.
///
/// The labels are intentionally inverted relative to everyday usage and
/// must stay that way for existing kiosk clients: `check_in` is the scan
/// that hands equipment to the student, `check_out` the scan that takes it
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    CheckIn,
    CheckOut,
}

impl ScanAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
        }
    }

    /// Kiosk-facing confirmation message for this action.
    pub fn message(&self) -> &'static str {
        match self {
            Self::CheckIn => "Checked out successfully.",
            Self::CheckOut => "Returned successfully.",
        }
    }
}

/// Why a scan was refused. Each kind renders differently on the kiosk,
/// so "no such code" and "code already used" stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRejection {
    /// No token row matches the scanned value
    UnknownToken,
    /// Token exists but was consumed or is past its expiry
    ExpiredOrUsed,
    /// Bound booking is not in a scannable status
    NotEligible,
}

impl ScanRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownToken => "Invalid token.",
            Self::ExpiredOrUsed => "Token expired or already used.",
            Self::NotEligible => "Booking not eligible for check-in/out.",
        }
    }

    /// Stable machine-readable tag for logs and metrics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::UnknownToken => "invalid_token",
            Self::ExpiredOrUsed => "expired_or_used",
            Self::NotEligible => "not_eligible",
        }
    }
}

/// Human-readable booking summary returned to the kiosk after a scan.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub student: Option<String>,
    pub equipment: Option<String>,
    pub lab: Option<String>,
    /// `"<start> → <end>"` formatted like `Mar 10, 2:00 PM → Mar 10, 4:00 PM`
    pub window: String,
}

/// The committed result of an accepted scan.
#[derive(Debug, Clone)]
pub struct ScanTransition {
    pub action: ScanAction,
    pub booking: Booking,
    pub summary: ScanSummary,
}

/// Result of running a scan: either a committed transition or a refusal
/// that left every row untouched.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Completed(ScanTransition),
    Rejected(ScanRejection),
}

/// Format a booking window for kiosk display.
pub fn format_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> String {
    format!(
        "{} → {}",
        starts_at.format("%b %d, %-I:%M %p"),
        ends_at.format("%b %d, %-I:%M %p")
    )
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn action_labels_keep_legacy_inversion() {
        assert_eq!(ScanAction::CheckIn.label(), "check_in");
        assert_eq!(ScanAction::CheckOut.label(), "check_out");
        // handing out says "checked out", returning says "returned"
        assert_eq!(ScanAction::CheckIn.message(), "Checked out successfully.");
        assert_eq!(ScanAction::CheckOut.message(), "Returned successfully.");
    }

    #[test]
    fn rejection_kinds_are_distinct() {
        assert_ne!(
            ScanRejection::UnknownToken.message(),
            ScanRejection::ExpiredOrUsed.message()
        );
        assert_eq!(ScanRejection::ExpiredOrUsed.tag(), "expired_or_used");
    }

    #[test]
    fn window_formatting() {
        let starts = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let ends = Utc.with_ymd_and_hms(2026, 3, 10, 16, 30, 0).unwrap();
        assert_eq!(format_window(starts, ends), "Mar 10, 2:00 PM → Mar 10, 4:30 PM");
    }
}
