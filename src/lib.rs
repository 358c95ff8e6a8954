//! # Labdesk Booking Service
//!
//! Campus lab-equipment booking and checkout: students request time slots,
//! staff approve them, and a kiosk scans short-lived QR tokens to hand
//! equipment out and take it back.
//!
//! ## Architecture
//!
//! - **domain**: entities, the booking status machine, repository traits
//! - **application**: services (booking lifecycle, availability, QR
//!   issuance, kiosk scan processing) and the authorization seam
//! - **infrastructure**: SeaORM persistence, migrations, JWT verification
//! - **interfaces**: axum HTTP API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::{SeaOrmRepositoryProvider, SeaOrmRoleProvider};
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_router;
