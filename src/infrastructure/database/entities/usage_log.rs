//! Usage log entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usage_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub booking_id: i64,
    pub user_id: i64,

    #[sea_orm(nullable)]
    pub lab_id: Option<i64>,

    #[sea_orm(nullable)]
    pub equipment_id: Option<i64>,

    #[sea_orm(nullable)]
    pub checked_in_at: Option<DateTimeUtc>,

    /// Null while the possession window is open
    #[sea_orm(nullable)]
    pub checked_out_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub kiosk_label: Option<String>,

    #[sea_orm(nullable)]
    pub meta: Option<Json>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
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
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
