//! QR token entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub booking_id: i64,

    /// Opaque unique token value; matched case-insensitively
    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTimeUtc,

    /// Set exactly once by the scan that consumed the token
    #[sea_orm(nullable)]
    pub used_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
