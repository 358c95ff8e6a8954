//! Create usage_logs table
//!
//! Possession windows. Lab/equipment references survive catalog deletions
//! (set null) so history keeps its shape.

use sea_orm_migration::prelude::*;

use super::m20251225_000001_create_users::Users;
use super::m20251225_000002_create_labs::Labs;
use super::m20251225_000003_create_equipment::Equipment;
use super::m20251225_000004_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsageLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsageLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UsageLogs::BookingId).big_integer().not_null())
                    .col(ColumnDef::new(UsageLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UsageLogs::LabId).big_integer())
                    .col(ColumnDef::new(UsageLogs::EquipmentId).big_integer())
                    .col(ColumnDef::new(UsageLogs::CheckedInAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(UsageLogs::CheckedOutAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(UsageLogs::KioskLabel).string())
                    .col(ColumnDef::new(UsageLogs::Meta).json())
                    .col(
                        ColumnDef::new(UsageLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_logs_booking")
                            .from(UsageLogs::Table, UsageLogs::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_logs_user")
                            .from(UsageLogs::Table, UsageLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_logs_lab")
                            .from(UsageLogs::Table, UsageLogs::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_logs_equipment")
                            .from(UsageLogs::Table, UsageLogs::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usage_logs_checked_in")
                    .table(UsageLogs::Table)
                    .col(UsageLogs::CheckedInAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsageLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UsageLogs {
    Table,
    Id,
    BookingId,
    UserId,
    LabId,
    EquipmentId,
    CheckedInAt,
    CheckedOutAt,
    KioskLabel,
    Meta,
    CreatedAt,
    UpdatedAt,
}
