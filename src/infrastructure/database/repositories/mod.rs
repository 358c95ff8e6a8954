//! SeaORM repository implementations

pub mod booking_repository;
pub mod equipment_repository;
pub mod lab_repository;
pub mod qr_token_repository;
pub mod repository_provider;
pub mod role_provider;
pub mod scan_gateway;
pub mod usage_log_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use role_provider::SeaOrmRoleProvider;

use crate::domain::DomainError;

/// Uniform mapping of driver errors into the domain error space.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}
