//! Repository provider: one trait object giving access to every
//! per-aggregate repository, backed by a single connection pool.

use crate::domain::booking::BookingRepository;
use crate::domain::equipment::EquipmentRepository;
use crate::domain::lab::LabRepository;
use crate::domain::qr_token::QrTokenRepository;
use crate::domain::scan::ScanGateway;
use crate::domain::usage_log::UsageLogRepository;
use crate::domain::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn labs(&self) -> &dyn LabRepository;

    fn equipment(&self) -> &dyn EquipmentRepository;

    fn bookings(&self) -> &dyn BookingRepository;

    fn qr_tokens(&self) -> &dyn QrTokenRepository;

    fn usage_logs(&self) -> &dyn UsageLogRepository;

    fn scans(&self) -> &dyn ScanGateway;
}
