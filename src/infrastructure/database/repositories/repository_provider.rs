//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::equipment::EquipmentRepository;
use crate::domain::lab::LabRepository;
use crate::domain::qr_token::QrTokenRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::scan::ScanGateway;
use crate::domain::usage_log::UsageLogRepository;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::equipment_repository::SeaOrmEquipmentRepository;
use super::lab_repository::SeaOrmLabRepository;
use super::qr_token_repository::SeaOrmQrTokenRepository;
use super::scan_gateway::SeaOrmScanGateway;
use super::usage_log_repository::SeaOrmUsageLogRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    labs: SeaOrmLabRepository,
    equipment: SeaOrmEquipmentRepository,
    bookings: SeaOrmBookingRepository,
    qr_tokens: SeaOrmQrTokenRepository,
    usage_logs: SeaOrmUsageLogRepository,
    scans: SeaOrmScanGateway,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            labs: SeaOrmLabRepository::new(db.clone()),
            equipment: SeaOrmEquipmentRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            qr_tokens: SeaOrmQrTokenRepository::new(db.clone()),
            usage_logs: SeaOrmUsageLogRepository::new(db.clone()),
            scans: SeaOrmScanGateway::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn labs(&self) -> &dyn LabRepository {
        &self.labs
    }

    fn equipment(&self) -> &dyn EquipmentRepository {
        &self.equipment
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn qr_tokens(&self) -> &dyn QrTokenRepository {
        &self.qr_tokens
    }

    fn usage_logs(&self) -> &dyn UsageLogRepository {
        &self.usage_logs
    }

    fn scans(&self) -> &dyn ScanGateway {
        &self.scans
    }
}
