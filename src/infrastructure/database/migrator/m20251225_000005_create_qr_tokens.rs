//! Create qr_tokens table
//!
//! Single-use kiosk credentials; rows cascade away with their booking.

use sea_orm_migration::prelude::*;

use super::m20251225_000004_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QrTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrTokens::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrTokens::BookingId).big_integer().not_null())
                    .col(
                        ColumnDef::new(QrTokens::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(QrTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QrTokens::UsedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(QrTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_qr_tokens_booking")
                            .from(QrTokens::Table, QrTokens::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_qr_tokens_booking_expires")
                    .table(QrTokens::Table)
                    .col(QrTokens::BookingId)
                    .col(QrTokens::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QrTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum QrTokens {
    Table,
    Id,
    BookingId,
    Token,
    ExpiresAt,
    UsedAt,
    CreatedAt,
}
