//! SeaORM implementation of UsageLogRepository (read model)

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::usage_log::{UsageLog, UsageLogRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::usage_log;

use super::db_err;

pub struct SeaOrmUsageLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsageLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: usage_log::Model) -> UsageLog {
    UsageLog {
        id: m.id,
        booking_id: m.booking_id,
        user_id: m.user_id,
        lab_id: m.lab_id,
        equipment_id: m.equipment_id,
        checked_in_at: m.checked_in_at,
        checked_out_at: m.checked_out_at,
        kiosk_label: m.kiosk_label,
        meta: m.meta,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl UsageLogRepository for SeaOrmUsageLogRepository {
    async fn find_open_for_booking(&self, booking_id: i64) -> DomainResult<Option<UsageLog>> {
        let model = usage_log::Entity::find()
            .filter(usage_log::Column::BookingId.eq(booking_id))
            .filter(usage_log::Column::CheckedOutAt.is_null())
            .order_by_desc(usage_log::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_booking(&self, booking_id: i64) -> DomainResult<Vec<UsageLog>> {
        let models = usage_log::Entity::find()
            .filter(usage_log::Column::BookingId.eq(booking_id))
            .order_by_desc(usage_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
