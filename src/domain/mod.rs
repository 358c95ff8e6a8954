//! Core business entities, state machines and repository interfaces

pub mod booking;
pub mod equipment;
pub mod error;
pub mod lab;
pub mod qr_token;
pub mod repositories;
pub mod scan;
pub mod usage_log;
pub mod user;

// Re-export commonly used types
pub use booking::{windows_overlap, Booking, BookingDetails, BookingStatus};
pub use equipment::Equipment;
pub use error::{DomainError, DomainResult};
pub use lab::Lab;
pub use qr_token::{QrToken, DEFAULT_TTL_MINUTES};
pub use repositories::RepositoryProvider;
pub use scan::{ScanAction, ScanOutcome, ScanRejection, ScanSummary, ScanTransition};
pub use usage_log::UsageLog;
pub use user::User;
