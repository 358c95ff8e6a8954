//! Indexes for the hot scan and availability queries.

use sea_orm_migration::prelude::*;

use super::m20251225_000004_create_bookings::Bookings;
use super::m20251225_000006_create_usage_logs::UsageLogs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // overlap guard scans by equipment + status
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_equipment_status")
                    .table(Bookings::Table)
                    .col(Bookings::EquipmentId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        // open-log lookup per booking
        manager
            .create_index(
                Index::create()
                    .name("idx_usage_logs_booking_checked_out")
                    .table(UsageLogs::Table)
                    .col(UsageLogs::BookingId)
                    .col(UsageLogs::CheckedOutAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_bookings_equipment_status")
                    .table(Bookings::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_usage_logs_booking_checked_out")
                    .table(UsageLogs::Table)
                    .to_owned(),
            )
            .await
    }
}
