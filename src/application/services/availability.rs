//! Equipment availability queries

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Read-only availability checker over the booking store.
///
/// Only `confirmed` and `checked_out` bookings hold equipment; pending,
/// cancelled and returned bookings never block a slot.
pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Distinct ids of equipment in `lab_id` that cannot be booked for
    /// `[starts_at, ends_at)`.
    pub async fn unavailable_equipment(
        &self,
        lab_id: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> DomainResult<Vec<i64>> {
        if ends_at <= starts_at {
            return Err(DomainError::Validation(
                "ends_at must be after starts_at".into(),
            ));
        }

        if self.repos.labs().find_by_id(lab_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Lab",
                field: "id",
                value: lab_id.to_string(),
            });
        }

        self.repos
            .bookings()
            .unavailable_equipment_ids(lab_id, starts_at, ends_at)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::application::authorization::{Actor, RoleSet};
    use crate::application::services::booking::{BookingService, NewBooking};
    use crate::application::services::test_support::{seed_catalog, setup_repos};

    fn t(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    #[tokio::test]
    async fn only_confirmed_and_checked_out_bookings_block() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let bookings = BookingService::new(repos.clone());
        let service = AvailabilityService::new(repos.clone());

        let student = Actor::new(seed.student_id, "Sam", RoleSet::from_names(["Student"]));
        let staff = Actor::new(seed.staff_id, "Dana", RoleSet::from_names(["LabStaff"]));

        // Confirmed booking on scope, pending booking on oscilloscope
        let scope = bookings
            .create(
                &student,
                NewBooking {
                    lab_id: seed.lab_id,
                    equipment_id: Some(seed.microscope_id),
                    title: None,
                    starts_at: t(10, 0),
                    ends_at: t(11, 0),
                    notes: None,
                },
            )
            .await
            .unwrap();
        bookings.approve(&staff, scope.id).await.unwrap();

        bookings
            .create(
                &student,
                NewBooking {
                    lab_id: seed.lab_id,
                    equipment_id: Some(seed.oscilloscope_id),
                    title: None,
                    starts_at: t(10, 0),
                    ends_at: t(11, 0),
                    notes: None,
                },
            )
            .await
            .unwrap();

        let unavailable = service
            .unavailable_equipment(seed.lab_id, t(10, 30), t(11, 30))
            .await
            .unwrap();
        assert_eq!(unavailable, vec![seed.microscope_id]);
    }

    #[tokio::test]
    async fn touching_window_is_available() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let bookings = BookingService::new(repos.clone());
        let service = AvailabilityService::new(repos.clone());

        let student = Actor::new(seed.student_id, "Sam", RoleSet::from_names(["Student"]));
        let staff = Actor::new(seed.staff_id, "Dana", RoleSet::from_names(["LabStaff"]));

        let b = bookings
            .create(
                &student,
                NewBooking {
                    lab_id: seed.lab_id,
                    equipment_id: Some(seed.microscope_id),
                    title: None,
                    starts_at: t(10, 0),
                    ends_at: t(11, 0),
                    notes: None,
                },
            )
            .await
            .unwrap();
        bookings.approve(&staff, b.id).await.unwrap();

        // [11:00, 12:00) only touches [10:00, 11:00)
        let unavailable = service
            .unavailable_equipment(seed.lab_id, t(11, 0), t(12, 0))
            .await
            .unwrap();
        assert!(unavailable.is_empty());
    }

    #[tokio::test]
    async fn rejects_inverted_window() {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let service = AvailabilityService::new(repos);

        let err = service
            .unavailable_equipment(seed.lab_id, t(11, 0), t(10, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_lab() {
        let repos = setup_repos().await;
        let service = AvailabilityService::new(repos);

        let err = service
            .unavailable_equipment(999, t(10, 0), t(11, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
