//! QR token issuance

use std::sync::Arc;

use tracing::info;

use crate::application::authorization::Actor;
use crate::domain::{DomainError, DomainResult, QrToken, RepositoryProvider, DEFAULT_TTL_MINUTES};

pub struct QrService {
    repos: Arc<dyn RepositoryProvider>,
}

impl QrService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Issue a fresh token for a confirmed or checked-out booking.
    ///
    /// Earlier tokens stay live; each one is independently valid until used
    /// or expired.
    pub async fn issue(
        &self,
        actor: &Actor,
        booking_id: i64,
        ttl_minutes: Option<i64>,
    ) -> DomainResult<QrToken> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })?;

        if !actor.has_approval_authority() && !booking.is_owned_by(actor.id) {
            return Err(DomainError::Forbidden("not the booking owner".into()));
        }

        if !booking.status.is_scannable() {
            return Err(DomainError::Conflict(
                "QR can be issued only for confirmed bookings.".into(),
            ));
        }

        let token = QrToken::issue(booking_id, ttl_minutes.unwrap_or(DEFAULT_TTL_MINUTES));
        let token = self.repos.qr_tokens().save(token).await?;

        info!(booking_id, expires_at = %token.expires_at, "QR token issued");
        Ok(token)
    }

    /// Latest still-valid token for a booking; `NotFound` when none is live.
    pub async fn latest_valid(&self, actor: &Actor, booking_id: i64) -> DomainResult<QrToken> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })?;

        if !actor.has_approval_authority() && !booking.is_owned_by(actor.id) {
            return Err(DomainError::Forbidden("not the booking owner".into()));
        }

        match self.repos.qr_tokens().find_latest_for_booking(booking_id).await? {
            Some(token) if token.is_valid() => Ok(token),
            _ => Err(DomainError::NotFound {
                entity: "QrToken",
                field: "booking_id",
                value: booking_id.to_string(),
            }),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::application::authorization::{Actor, RoleSet};
    use crate::application::services::booking::{BookingService, NewBooking};
    use crate::application::services::test_support::{seed_catalog, setup_repos, Seed};

    async fn confirmed_booking(
        repos: &Arc<dyn RepositoryProvider>,
        seed: &Seed,
    ) -> (i64, Actor, Actor) {
        let bookings = BookingService::new(repos.clone());
        let student = Actor::new(seed.student_id, "Sam", RoleSet::from_names(["Student"]));
        let staff = Actor::new(seed.staff_id, "Dana", RoleSet::from_names(["LabStaff"]));

        let booking = bookings
            .create(
                &student,
                NewBooking {
                    lab_id: seed.lab_id,
                    equipment_id: Some(seed.microscope_id),
                    title: None,
                    starts_at: Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap(),
                    ends_at: Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap(),
                    notes: None,
                },
            )
            .await
            .unwrap();
        (booking.id, student, staff)
    }

    #[tokio::test]
    async fn issue_rejected_while_pending() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let (booking_id, student, _) = confirmed_booking(&repos, &seed).await;
        let service = QrService::new(repos);

        let err = service.issue(&student, booking_id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn issue_allows_multiple_live_tokens() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let (booking_id, student, staff) = confirmed_booking(&repos, &seed).await;
        BookingService::new(repos.clone())
            .approve(&staff, booking_id)
            .await
            .unwrap();
        let service = QrService::new(repos);

        let first = service.issue(&student, booking_id, None).await.unwrap();
        let second = service.issue(&student, booking_id, Some(30)).await.unwrap();

        assert_ne!(first.token, second.token);
        assert!(first.is_valid());
        assert!(second.is_valid());

        // latest_valid returns the most recently issued one
        let latest = service.latest_valid(&student, booking_id).await.unwrap();
        assert_eq!(latest.token, second.token);
    }

    #[tokio::test]
    async fn latest_valid_reports_not_found_without_live_token() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let (booking_id, student, staff) = confirmed_booking(&repos, &seed).await;
        BookingService::new(repos.clone())
            .approve(&staff, booking_id)
            .await
            .unwrap();
        let service = QrService::new(repos);

        // no token yet
        assert!(matches!(
            service.latest_valid(&student, booking_id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));

        // an expired token does not count
        service.issue(&student, booking_id, Some(0)).await.unwrap();
        assert!(matches!(
            service.latest_valid(&student, booking_id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn strangers_cannot_issue() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let (booking_id, _, staff) = confirmed_booking(&repos, &seed).await;
        BookingService::new(repos.clone())
            .approve(&staff, booking_id)
            .await
            .unwrap();
        let service = QrService::new(repos);

        let stranger = Actor::new(seed.other_student_id, "Riley", RoleSet::from_names(["Student"]));
        let err = service.issue(&stranger, booking_id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
