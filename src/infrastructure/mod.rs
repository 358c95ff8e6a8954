//! External concerns: database and token crypto

pub mod crypto;
pub mod database;

pub use database::{init_database, DatabaseConfig};
