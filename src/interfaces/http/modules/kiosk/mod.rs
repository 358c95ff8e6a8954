//! Kiosk scan endpoints

pub mod dto;
pub mod handlers;

pub use handlers::{scan, scan_url, KioskAppState};
