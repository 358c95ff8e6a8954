//! Usage log aggregate

pub mod model;
pub mod repository;

pub use model::UsageLog;
pub use repository::UsageLogRepository;
