//! SeaORM implementation of QrTokenRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::qr_token::{QrToken, QrTokenRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::qr_token;

use super::db_err;

pub struct SeaOrmQrTokenRepository {
    db: DatabaseConnection,
}

impl SeaOrmQrTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: qr_token::Model) -> QrToken {
    QrToken {
        id: m.id,
        booking_id: m.booking_id,
        token: m.token,
        expires_at: m.expires_at,
        used_at: m.used_at,
        created_at: m.created_at,
    }
}

#[async_trait]
impl QrTokenRepository for SeaOrmQrTokenRepository {
    async fn save(&self, t: QrToken) -> DomainResult<QrToken> {
        debug!("Saving QR token for booking {}", t.booking_id);

        let model = qr_token::ActiveModel {
            booking_id: Set(t.booking_id),
            token: Set(t.token),
            expires_at: Set(t.expires_at),
            used_at: Set(t.used_at),
            created_at: Set(t.created_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_latest_for_booking(&self, booking_id: i64) -> DomainResult<Option<QrToken>> {
        let model = qr_token::Entity::find()
            .filter(qr_token::Column::BookingId.eq(booking_id))
            .order_by_desc(qr_token::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}
