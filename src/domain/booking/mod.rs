//! Booking aggregate: entity, status machine and repository interface

pub mod model;
pub mod repository;

pub use model::{windows_overlap, Booking, BookingDetails, BookingStatus};
pub use repository::BookingRepository;
