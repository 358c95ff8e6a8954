//! Booking domain entity

use chrono::{DateTime, Utc};

/// Booking lifecycle status
///
/// The status set is closed: `parse` rejects anything outside these five
/// values so unknown strings never enter the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Requested by a student, awaiting staff approval
    Pending,
    /// Approved by staff; blocks the equipment for its window
    Confirmed,
    /// Equipment physically handed out via a kiosk scan
    CheckedOut,
    /// Equipment returned via a second kiosk scan (terminal)
    Returned,
    /// Withdrawn by the owner or staff (terminal)
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedOut => "checked_out",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "checked_out" => Some(Self::CheckedOut),
            "returned" => Some(Self::Returned),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Returned | Self::Cancelled)
    }

    /// Statuses that hold equipment against other bookings.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedOut)
    }

    /// Statuses a kiosk scan may act on (also gates QR issuance).
    pub fn is_scannable(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedOut)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Windows that merely touch (one ends exactly where the other starts) do
/// not overlap.
pub fn windows_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Reservation of an optional specific equipment unit within a lab
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i64,
    /// Requesting user (owner)
    pub user_id: i64,
    pub lab_id: i64,
    /// None means "any equipment in this lab"
    pub equipment_id: Option<i64>,
    pub title: Option<String>,
    /// Window start (inclusive)
    pub starts_at: DateTime<Utc>,
    /// Window end (exclusive)
    pub ends_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    /// Staff member who approved the booking
    pub confirmed_by: Option<i64>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_id: i64,
        lab_id: i64,
        equipment_id: Option<i64>,
        title: Option<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            lab_id,
            equipment_id,
            title,
            starts_at,
            ends_at,
            status: BookingStatus::Pending,
            notes,
            confirmed_by: None,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `ends_at > starts_at`
    pub fn window_is_valid(&self) -> bool {
        self.ends_at > self.starts_at
    }

    pub fn overlaps(&self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> bool {
        windows_overlap(self.starts_at, self.ends_at, starts_at, ends_at)
    }

    /// Approve this booking, stamping who confirmed it and when.
    pub fn confirm(&mut self, approver_id: i64, at: DateTime<Utc>) {
        self.status = BookingStatus::Confirmed;
        self.confirmed_by = Some(approver_id);
        self.confirmed_at = Some(at);
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }

    pub fn mark_checked_out(&mut self) {
        self.status = BookingStatus::CheckedOut;
    }

    pub fn mark_returned(&mut self) {
        self.status = BookingStatus::Returned;
    }

    /// Cancellation is allowed from pending/confirmed only.
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Booking joined with the display names of its user/lab/equipment.
///
/// Read model for calendar feeds, approval lists and detail views; the
/// names are resolved by the repository in one query.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub user_name: Option<String>,
    pub lab_name: Option<String>,
    pub equipment_name: Option<String>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    fn sample_booking() -> Booking {
        Booking::new(
            1,
            1,
            Some(7),
            Some("Microscope session".into()),
            t(10, 0),
            t(11, 0),
            None,
        )
    }

    #[test]
    fn new_booking_is_pending() {
        let b = sample_booking();
        assert_eq!(b.status, BookingStatus::Pending);
        assert!(b.window_is_valid());
        assert!(b.confirmed_by.is_none());
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (t(10, 0), t(11, 0), t(10, 30), t(11, 30)),
            (t(10, 0), t(11, 0), t(9, 0), t(10, 30)),
            (t(10, 0), t(11, 0), t(10, 15), t(10, 45)),
            (t(10, 0), t(11, 0), t(11, 0), t(12, 0)),
            (t(10, 0), t(11, 0), t(8, 0), t(9, 0)),
        ];
        for (a1, a2, b1, b2) in cases {
            assert_eq!(
                windows_overlap(a1, a2, b1, b2),
                windows_overlap(b1, b2, a1, a2),
                "symmetry violated for [{a1}, {a2}) vs [{b1}, {b2})"
            );
        }
    }

    #[test]
    fn overlap_is_reflexive_for_nondegenerate_windows() {
        assert!(windows_overlap(t(10, 0), t(11, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        // [10:00, 11:00) and [11:00, 12:00) share only the boundary instant
        assert!(!windows_overlap(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
        assert!(!windows_overlap(t(11, 0), t(12, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn contained_window_overlaps() {
        assert!(windows_overlap(t(10, 0), t(12, 0), t(10, 30), t(11, 0)));
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::CheckedOut,
            BookingStatus::Returned,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(BookingStatus::parse("on_loan"), None);
        assert_eq!(BookingStatus::parse("Pending"), None);
        assert_eq!(BookingStatus::parse(""), None);
    }

    #[test]
    fn confirm_stamps_approver() {
        let mut b = sample_booking();
        let at = t(9, 0);
        b.confirm(42, at);
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.confirmed_by, Some(42));
        assert_eq!(b.confirmed_at, Some(at));
    }

    #[test]
    fn cancel_allowed_only_before_checkout() {
        let mut b = sample_booking();
        assert!(b.can_cancel());
        b.confirm(42, t(9, 0));
        assert!(b.can_cancel());
        b.mark_checked_out();
        assert!(!b.can_cancel());
        b.mark_returned();
        assert!(!b.can_cancel());
    }

    #[test]
    fn scannable_statuses() {
        assert!(!BookingStatus::Pending.is_scannable());
        assert!(BookingStatus::Confirmed.is_scannable());
        assert!(BookingStatus::CheckedOut.is_scannable());
        assert!(!BookingStatus::Returned.is_scannable());
        assert!(!BookingStatus::Cancelled.is_scannable());
    }

    #[test]
    fn availability_blocking_statuses() {
        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(BookingStatus::CheckedOut.blocks_availability());
        assert!(!BookingStatus::Pending.blocks_availability());
        assert!(!BookingStatus::Returned.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
    }

    #[test]
    fn window_must_be_nonempty() {
        let mut b = sample_booking();
        b.ends_at = b.starts_at;
        assert!(!b.window_is_valid());
        b.ends_at = b.starts_at - Duration::minutes(5);
        assert!(!b.window_is_valid());
    }
}
