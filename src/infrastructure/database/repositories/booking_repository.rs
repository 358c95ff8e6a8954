//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::JoinType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::domain::booking::{Booking, BookingDetails, BookingRepository, BookingStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, equipment, lab, user};

use super::db_err;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let status = BookingStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Validation(format!("unknown booking status '{}'", m.status))
    })?;
    Ok(Booking {
        id: m.id,
        user_id: m.user_id,
        lab_id: m.lab_id,
        equipment_id: m.equipment_id,
        title: m.title,
        starts_at: m.starts_at,
        ends_at: m.ends_at,
        status,
        notes: m.notes,
        confirmed_by: m.confirmed_by,
        confirmed_at: m.confirmed_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

/// Booking row joined with display names, for the detail read model.
#[derive(Debug, FromQueryResult)]
struct BookingDetailsRow {
    id: i64,
    user_id: i64,
    lab_id: i64,
    equipment_id: Option<i64>,
    title: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: String,
    notes: Option<String>,
    confirmed_by: Option<i64>,
    confirmed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: Option<String>,
    lab_name: Option<String>,
    equipment_name: Option<String>,
}

impl BookingDetailsRow {
    fn into_details(self) -> DomainResult<BookingDetails> {
        let status = BookingStatus::parse(&self.status).ok_or_else(|| {
            DomainError::Validation(format!("unknown booking status '{}'", self.status))
        })?;
        Ok(BookingDetails {
            booking: Booking {
                id: self.id,
                user_id: self.user_id,
                lab_id: self.lab_id,
                equipment_id: self.equipment_id,
                title: self.title,
                starts_at: self.starts_at,
                ends_at: self.ends_at,
                status,
                notes: self.notes,
                confirmed_by: self.confirmed_by,
                confirmed_at: self.confirmed_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            user_name: self.user_name,
            lab_name: self.lab_name,
            equipment_name: self.equipment_name,
        })
    }
}

/// Base query joining the display names onto bookings.
fn details_query() -> sea_orm::Select<booking::Entity> {
    booking::Entity::find()
        .column_as(user::Column::Name, "user_name")
        .column_as(lab::Column::Name, "lab_name")
        .column_as(equipment::Column::Name, "equipment_name")
        .join(JoinType::LeftJoin, booking::Relation::User.def())
        .join(JoinType::LeftJoin, booking::Relation::Lab.def())
        .join(JoinType::LeftJoin, booking::Relation::Equipment.def())
}

const BLOCKING_STATUSES: [&str; 2] = ["confirmed", "checked_out"];

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create_guarded(&self, b: Booking) -> DomainResult<Booking> {
        debug!("Creating booking for user {}", b.user_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        // Overlap re-check inside the insert transaction; lab-level bookings
        // (no equipment) are intentionally not guarded.
        if let Some(equipment_id) = b.equipment_id {
            let conflict = booking::Entity::find()
                .filter(booking::Column::EquipmentId.eq(equipment_id))
                .filter(booking::Column::Status.is_in(BLOCKING_STATUSES))
                .filter(booking::Column::StartsAt.lt(b.ends_at))
                .filter(booking::Column::EndsAt.gt(b.starts_at))
                .one(&txn)
                .await
                .map_err(db_err)?;

            if conflict.is_some() {
                return Err(DomainError::Conflict(
                    "Selected equipment is already booked for the chosen time range.".into(),
                ));
            }
        }

        let model = booking::ActiveModel {
            user_id: Set(b.user_id),
            lab_id: Set(b.lab_id),
            equipment_id: Set(b.equipment_id),
            title: Set(b.title),
            starts_at: Set(b.starts_at),
            ends_at: Set(b.ends_at),
            status: Set(b.status.as_str().to_string()),
            notes: Set(b.notes),
            confirmed_by: Set(b.confirmed_by),
            confirmed_at: Set(b.confirmed_at),
            created_at: Set(b.created_at),
            updated_at: Set(b.updated_at),
            ..Default::default()
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_details(&self, id: i64) -> DomainResult<Option<BookingDetails>> {
        let row = details_query()
            .filter(booking::Column::Id.eq(id))
            .into_model::<BookingDetailsRow>()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        row.map(BookingDetailsRow::into_details).transpose()
    }

    async fn update(&self, b: Booking) -> DomainResult<()> {
        debug!("Updating booking: {}", b.id);

        let existing = booking::Entity::find_by_id(b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: b.id.to_string(),
            });
        }

        let model = booking::ActiveModel {
            id: Set(b.id),
            user_id: Set(b.user_id),
            lab_id: Set(b.lab_id),
            equipment_id: Set(b.equipment_id),
            title: Set(b.title),
            starts_at: Set(b.starts_at),
            ends_at: Set(b.ends_at),
            status: Set(b.status.as_str().to_string()),
            notes: Set(b.notes),
            confirmed_by: Set(b.confirmed_by),
            confirmed_at: Set(b.confirmed_at),
            created_at: Set(b.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = booking::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_window(
        &self,
        owner: Option<i64>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingDetails>> {
        let mut query = details_query().order_by_asc(booking::Column::StartsAt);

        if let Some(owner) = owner {
            query = query.filter(booking::Column::UserId.eq(owner));
        }
        if let Some(from) = from {
            query = query.filter(booking::Column::StartsAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(booking::Column::StartsAt.lte(to));
        }

        let rows = query
            .into_model::<BookingDetailsRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rows.into_iter()
            .map(BookingDetailsRow::into_details)
            .collect()
    }

    async fn list_pending(&self) -> DomainResult<Vec<BookingDetails>> {
        let rows = details_query()
            .filter(booking::Column::Status.eq(BookingStatus::Pending.as_str()))
            .order_by_asc(booking::Column::StartsAt)
            .into_model::<BookingDetailsRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rows.into_iter()
            .map(BookingDetailsRow::into_details)
            .collect()
    }

    async fn unavailable_equipment_ids(
        &self,
        lab_id: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> DomainResult<Vec<i64>> {
        let ids: Vec<Option<i64>> = booking::Entity::find()
            .select_only()
            .column(booking::Column::EquipmentId)
            .distinct()
            .join(JoinType::InnerJoin, booking::Relation::Equipment.def())
            .filter(equipment::Column::LabId.eq(lab_id))
            .filter(booking::Column::EquipmentId.is_not_null())
            .filter(booking::Column::Status.is_in(BLOCKING_STATUSES))
            .filter(booking::Column::StartsAt.lt(ends_at))
            .filter(booking::Column::EndsAt.gt(starts_at))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(ids.into_iter().flatten().collect())
    }
}
