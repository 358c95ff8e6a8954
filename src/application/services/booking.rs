//! Booking lifecycle service
//!
//! Owns every status transition except the kiosk-driven ones
//! (`checked_out` / `returned`), which belong to the scan gateway.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::authorization::Actor;
use crate::domain::{
    Booking, BookingDetails, BookingStatus, DomainError, DomainResult, RepositoryProvider,
};

/// Booking creation request, already shed of transport concerns.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub lab_id: i64,
    /// None books "any equipment in this lab"
    pub equipment_id: Option<i64>,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub notes: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a `pending` booking for the requesting actor.
    ///
    /// Validations run before any write; the equipment overlap guard is
    /// re-checked inside the insert transaction by the repository.
    /// Equipment-less bookings skip the overlap guard entirely.
    pub async fn create(&self, actor: &Actor, req: NewBooking) -> DomainResult<Booking> {
        if req.ends_at <= req.starts_at {
            return Err(DomainError::Validation(
                "ends_at must be after starts_at".into(),
            ));
        }

        if self.repos.labs().find_by_id(req.lab_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "unknown lab id {}",
                req.lab_id
            )));
        }

        if let Some(equipment_id) = req.equipment_id {
            let equipment = self
                .repos
                .equipment()
                .find_by_id(equipment_id)
                .await?
                .ok_or_else(|| {
                    DomainError::Validation(format!("unknown equipment id {equipment_id}"))
                })?;
            if !equipment.belongs_to_lab(req.lab_id) {
                return Err(DomainError::Validation(
                    "Selected equipment does not belong to the chosen lab.".into(),
                ));
            }
        }

        info!(
            user_id = actor.id,
            lab_id = req.lab_id,
            equipment_id = req.equipment_id,
            "Creating booking"
        );

        let booking = Booking::new(
            actor.id,
            req.lab_id,
            req.equipment_id,
            req.title,
            req.starts_at,
            req.ends_at,
            req.notes,
        );

        self.repos.bookings().create_guarded(booking).await
    }

    /// Approve a pending booking, stamping the approver.
    pub async fn approve(&self, actor: &Actor, booking_id: i64) -> DomainResult<Booking> {
        if !actor.has_approval_authority() {
            return Err(DomainError::Forbidden(
                "approval authority required".into(),
            ));
        }

        let mut booking = self.find_existing(booking_id).await?;

        if booking.status != BookingStatus::Pending {
            return Err(DomainError::Conflict(
                "Only pending bookings can be approved.".into(),
            ));
        }

        booking.confirm(actor.id, Utc::now());
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id, approver = actor.id, "Booking approved");
        Ok(booking)
    }

    /// Cancel a booking. Owners may cancel their own; approval authority
    /// may cancel any. Only pending/confirmed bookings can be cancelled.
    pub async fn cancel(&self, actor: &Actor, booking_id: i64) -> DomainResult<Booking> {
        let mut booking = self.find_existing(booking_id).await?;
        self.require_owner_or_authority(actor, &booking)?;

        if !booking.can_cancel() {
            return Err(DomainError::Conflict(
                "Booking can no longer be cancelled.".into(),
            ));
        }

        booking.cancel();
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id, actor = actor.id, "Booking cancelled");
        Ok(booking)
    }

    /// Direct status edit by approval authority. The status arrives already
    /// parsed: unknown values never get past the boundary.
    pub async fn update_status(
        &self,
        actor: &Actor,
        booking_id: i64,
        status: BookingStatus,
    ) -> DomainResult<Booking> {
        if !actor.has_approval_authority() {
            return Err(DomainError::Forbidden(
                "approval authority required".into(),
            ));
        }

        let mut booking = self.find_existing(booking_id).await?;
        booking.status = status;
        self.repos.bookings().update(booking.clone()).await?;

        info!(booking_id, status = %status, actor = actor.id, "Booking status updated");
        Ok(booking)
    }

    /// Delete a booking (tokens and usage logs cascade). Persistence
    /// failures are logged with context and surfaced, not swallowed.
    pub async fn delete(&self, actor: &Actor, booking_id: i64) -> DomainResult<()> {
        let booking = self.find_existing(booking_id).await?;
        self.require_owner_or_authority(actor, &booking)?;

        if let Err(e) = self.repos.bookings().delete(booking_id).await {
            warn!(booking_id, actor = actor.id, error = %e, "Failed to delete booking");
            return Err(e);
        }
        Ok(())
    }

    /// Booking details with display names; owner or authority only.
    pub async fn details(&self, actor: &Actor, booking_id: i64) -> DomainResult<BookingDetails> {
        let details = self
            .repos
            .bookings()
            .find_details(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })?;
        self.require_owner_or_authority(actor, &details.booking)?;
        Ok(details)
    }

    /// Calendar feed: staff see every booking, students only their own.
    pub async fn calendar(
        &self,
        actor: &Actor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingDetails>> {
        let owner = if actor.has_approval_authority() {
            None
        } else {
            Some(actor.id)
        };
        self.repos.bookings().list_window(owner, from, to).await
    }

    /// Pending bookings awaiting approval, oldest window first.
    pub async fn pending_approvals(&self, actor: &Actor) -> DomainResult<Vec<BookingDetails>> {
        if !actor.has_approval_authority() {
            return Err(DomainError::Forbidden(
                "approval authority required".into(),
            ));
        }
        self.repos.bookings().list_pending().await
    }

    async fn find_existing(&self, booking_id: i64) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }

    fn require_owner_or_authority(&self, actor: &Actor, booking: &Booking) -> DomainResult<()> {
        if actor.has_approval_authority() || booking.is_owned_by(actor.id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "not the booking owner".into(),
            ))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::application::authorization::{Actor, RoleSet};
    use crate::application::services::test_support::{seed_catalog, setup_repos, Seed};

    fn t(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    fn student(seed: &Seed) -> Actor {
        Actor::new(seed.student_id, "Sam", RoleSet::from_names(["Student"]))
    }

    fn staff(seed: &Seed) -> Actor {
        Actor::new(seed.staff_id, "Dana", RoleSet::from_names(["LabStaff"]))
    }

    fn request(seed: &Seed, equipment_id: Option<i64>, start: (u32, u32), end: (u32, u32)) -> NewBooking {
        NewBooking {
            lab_id: seed.lab_id,
            equipment_id,
            title: Some("Session".into()),
            starts_at: t(start.0, start.1),
            ends_at: t(end.0, end.1),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.id > 0);
    }

    #[tokio::test]
    async fn confirmed_booking_blocks_overlapping_creation() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let first = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        service.approve(&staff(&seed), first.id).await.unwrap();

        // overlapping window is refused
        let err = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 30), (11, 30)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // back-to-back window is fine
        service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (11, 0), (12, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_bookings_do_not_block_creation() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        // same slot, same equipment: allowed while the first is pending
        service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn equipmentless_bookings_skip_overlap_guard() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let first = service
            .create(&student(&seed), request(&seed, None, (10, 0), (11, 0)))
            .await
            .unwrap();
        service.approve(&staff(&seed), first.id).await.unwrap();

        // known gap: lab-level bookings are never overlap-checked
        service
            .create(&student(&seed), request(&seed, None, (10, 0), (11, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn equipment_must_belong_to_lab() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let mut req = request(&seed, Some(seed.other_lab_equipment_id), (10, 0), (11, 0));
        req.lab_id = seed.lab_id;
        let err = service.create(&student(&seed), req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn approve_requires_pending_status() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos.clone());

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();

        let approved = service.approve(&staff(&seed), booking.id).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Confirmed);
        assert_eq!(approved.confirmed_by, Some(seed.staff_id));
        assert!(approved.confirmed_at.is_some());

        // second approval is a reported conflict, not a mutation
        let err = service.approve(&staff(&seed), booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let reloaded = repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, BookingStatus::Confirmed);
        assert_eq!(reloaded.confirmed_by, Some(seed.staff_id));
    }

    #[tokio::test]
    async fn approve_requires_authority() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        let err = service.approve(&student(&seed), booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn owner_may_cancel_until_checkout() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        let cancelled = service.cancel(&student(&seed), booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // terminal: cancelling again is a conflict
        let err = service.cancel(&student(&seed), booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancel_rejected_once_checked_out() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        service.approve(&staff(&seed), booking.id).await.unwrap();
        service
            .update_status(&staff(&seed), booking.id, BookingStatus::CheckedOut)
            .await
            .unwrap();

        let err = service.cancel(&student(&seed), booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn strangers_cannot_touch_foreign_bookings() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();

        let stranger = Actor::new(seed.other_student_id, "Riley", RoleSet::from_names(["Student"]));
        assert!(matches!(
            service.cancel(&stranger, booking.id).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(matches!(
            service.delete(&stranger, booking.id).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(matches!(
            service.details(&stranger, booking.id).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn calendar_scopes_students_to_own_bookings() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos);

        service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        let other = Actor::new(seed.other_student_id, "Riley", RoleSet::from_names(["Student"]));
        service
            .create(&other, request(&seed, Some(seed.oscilloscope_id), (12, 0), (13, 0)))
            .await
            .unwrap();

        let own = service.calendar(&student(&seed), None, None).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].booking.user_id, seed.student_id);

        let all = service.calendar(&staff(&seed), None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_name.as_deref(), Some("Sam Student"));
    }

    #[tokio::test]
    async fn deleting_booking_removes_it() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = BookingService::new(repos.clone());

        let booking = service
            .create(&student(&seed), request(&seed, Some(seed.microscope_id), (10, 0), (11, 0)))
            .await
            .unwrap();
        service.delete(&student(&seed), booking.id).await.unwrap();
        assert!(repos.bookings().find_by_id(booking.id).await.unwrap().is_none());
    }
}
