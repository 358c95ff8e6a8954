//! Create bookings table
//!
//! Stores reservation windows with their lifecycle status. Overlap
//! conflicts are enforced on the write path, not by a constraint.

use sea_orm_migration::prelude::*;

use super::m20251225_000001_create_users::Users;
use super::m20251225_000002_create_labs::Labs;
use super::m20251225_000003_create_equipment::Equipment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::LabId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::EquipmentId).big_integer())
                    .col(ColumnDef::new(Bookings::Title).string())
                    .col(
                        ColumnDef::new(Bookings::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Bookings::Notes).text())
                    .col(ColumnDef::new(Bookings::ConfirmedBy).big_integer())
                    .col(ColumnDef::new(Bookings::ConfirmedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_lab")
                            .from(Bookings::Table, Bookings::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_equipment")
                            .from(Bookings::Table, Bookings::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_confirmed_by")
                            .from(Bookings::Table, Bookings::ConfirmedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_starts")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::StartsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_lab_starts")
                    .table(Bookings::Table)
                    .col(Bookings::LabId)
                    .col(Bookings::StartsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bookings {
    Table,
    Id,
    UserId,
    LabId,
    EquipmentId,
    Title,
    StartsAt,
    EndsAt,
    Status,
    Notes,
    ConfirmedBy,
    ConfirmedAt,
    CreatedAt,
    UpdatedAt,
}
