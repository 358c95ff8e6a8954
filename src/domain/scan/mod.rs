//! Kiosk scan transition: outcome types and transactional gateway

pub mod gateway;
pub mod model;

pub use gateway::ScanGateway;
pub use model::{
    format_window, ScanAction, ScanOutcome, ScanRejection, ScanSummary, ScanTransition,
};
