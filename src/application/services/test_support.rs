//! Shared fixtures for service tests: in-memory database + seeded catalog.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use crate::domain::{Equipment, Lab, RepositoryProvider, User};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

/// Fresh in-memory SQLite with all migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_repos() -> Arc<dyn RepositoryProvider> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(SeaOrmRepositoryProvider::new(db))
}

pub struct Seed {
    pub student_id: i64,
    pub other_student_id: i64,
    pub staff_id: i64,
    pub lab_id: i64,
    pub other_lab_id: i64,
    pub microscope_id: i64,
    pub oscilloscope_id: i64,
    pub other_lab_equipment_id: i64,
}

/// Two labs, three users, three pieces of equipment.
pub async fn seed_catalog(repos: &dyn RepositoryProvider) -> Seed {
    let student = repos
        .users()
        .save(User::new("Sam Student", "sam@campus.test"))
        .await
        .expect("seed student");
    let other_student = repos
        .users()
        .save(User::new("Riley Other", "riley@campus.test"))
        .await
        .expect("seed second student");
    let staff = repos
        .users()
        .save(User::new("Dana Staff", "dana@campus.test"))
        .await
        .expect("seed staff");

    let lab = repos
        .labs()
        .save(Lab::new("Optics Lab"))
        .await
        .expect("seed lab");
    let other_lab = repos
        .labs()
        .save(Lab::new("Chem Lab"))
        .await
        .expect("seed second lab");

    let microscope = repos
        .equipment()
        .save(Equipment::new(lab.id, "Microscope"))
        .await
        .expect("seed microscope");
    let oscilloscope = repos
        .equipment()
        .save(Equipment::new(lab.id, "Oscilloscope"))
        .await
        .expect("seed oscilloscope");
    let centrifuge = repos
        .equipment()
        .save(Equipment::new(other_lab.id, "Centrifuge"))
        .await
        .expect("seed centrifuge");

    Seed {
        student_id: student.id,
        other_student_id: other_student.id,
        staff_id: staff.id,
        lab_id: lab.id,
        other_lab_id: other_lab.id,
        microscope_id: microscope.id,
        oscilloscope_id: oscilloscope.id,
        other_lab_equipment_id: centrifuge.id,
    }
}
