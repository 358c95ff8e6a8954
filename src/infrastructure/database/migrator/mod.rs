//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20251225_000001_create_users;
mod m20251225_000002_create_labs;
mod m20251225_000003_create_equipment;
mod m20251225_000004_create_bookings;
mod m20251225_000005_create_qr_tokens;
mod m20251225_000006_create_usage_logs;
mod m20251227_000007_create_roles;
mod m20251227_000008_add_performance_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251225_000001_create_users::Migration),
            Box::new(m20251225_000002_create_labs::Migration),
            Box::new(m20251225_000003_create_equipment::Migration),
            Box::new(m20251225_000004_create_bookings::Migration),
            Box::new(m20251225_000005_create_qr_tokens::Migration),
            Box::new(m20251225_000006_create_usage_logs::Migration),
            Box::new(m20251227_000007_create_roles::Migration),
            Box::new(m20251227_000008_add_performance_indexes::Migration),
        ]
    }
}
