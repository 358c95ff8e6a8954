//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingDetails};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking, re-running the equipment overlap guard inside
    /// the same transaction as the insert so two concurrent requests for the
    /// same equipment/window cannot both succeed.
    ///
    /// Returns `Conflict` when a confirmed/checked-out booking already
    /// overlaps the requested window for the same equipment. Bookings with
    /// no specific equipment are inserted without an overlap guard.
    async fn create_guarded(&self, booking: Booking) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>>;

    /// Find booking by ID with user/lab/equipment names resolved
    async fn find_details(&self, id: i64) -> DomainResult<Option<BookingDetails>>;

    /// Update an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Delete a booking (QR tokens and usage logs cascade)
    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// List bookings ordered by start time, optionally restricted to an
    /// owner and/or to bookings starting inside `[from, to]`.
    async fn list_window(
        &self,
        owner: Option<i64>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingDetails>>;

    /// All pending bookings ordered by start time (approval queue)
    async fn list_pending(&self) -> DomainResult<Vec<BookingDetails>>;

    /// Distinct equipment ids in the given lab held by a confirmed or
    /// checked-out booking overlapping `[starts_at, ends_at)`.
    async fn unavailable_equipment_ids(
        &self,
        lab_id: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> DomainResult<Vec<i64>>;
}
