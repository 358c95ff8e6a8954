//! Create labs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Labs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Labs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Labs::Code).string())
                    .col(ColumnDef::new(Labs::Name).string().not_null())
                    .col(ColumnDef::new(Labs::Location).string())
                    .col(ColumnDef::new(Labs::Capacity).integer())
                    .col(
                        ColumnDef::new(Labs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Labs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Labs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Labs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Labs {
    Table,
    Id,
    Code,
    Name,
    Location,
    Capacity,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
