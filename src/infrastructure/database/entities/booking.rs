//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: i64,
    pub lab_id: i64,

    #[sea_orm(nullable)]
    pub equipment_id: Option<i64>,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    /// Window start (inclusive)
    pub starts_at: DateTimeUtc,
    /// Window end (exclusive)
    pub ends_at: DateTimeUtc,

    /// Status: pending, confirmed, checked_out, returned, cancelled
    pub status: String,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    #[sea_orm(nullable)]
    pub confirmed_by: Option<i64>,

    #[sea_orm(nullable)]
    pub confirmed_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::lab::Entity",
        from = "Column::LabId",
        to = "super::lab::Column::Id"
    )]
    Lab,
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::Id"
    )]
    Equipment,
    #[sea_orm(has_many = "super::qr_token::Entity")]
    QrToken,
    #[sea_orm(has_many = "super::usage_log::Entity")]
    UsageLog,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::lab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lab.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl Related<super::qr_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrToken.def()
    }
}

impl Related<super::usage_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsageLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
