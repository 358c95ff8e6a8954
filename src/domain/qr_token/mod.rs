//! QR token aggregate

pub mod model;
pub mod repository;

pub use model::{QrToken, DEFAULT_TTL_MINUTES};
pub use repository::QrTokenRepository;
