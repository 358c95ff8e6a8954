//! Create equipment table

use sea_orm_migration::prelude::*;

use super::m20251225_000002_create_labs::Labs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Equipment::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Equipment::LabId).big_integer().not_null())
                    .col(ColumnDef::new(Equipment::Name).string().not_null())
                    .col(ColumnDef::new(Equipment::Category).string())
                    .col(ColumnDef::new(Equipment::SerialNumber).string())
                    .col(
                        ColumnDef::new(Equipment::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Equipment::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Equipment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Equipment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_lab")
                            .from(Equipment::Table, Equipment::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_equipment_lab")
                    .table(Equipment::Table)
                    .col(Equipment::LabId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Equipment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Equipment {
    Table,
    Id,
    LabId,
    Name,
    Category,
    SerialNumber,
    IsActive,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
