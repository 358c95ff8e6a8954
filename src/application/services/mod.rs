//! Application services

pub mod availability;
pub mod booking;
pub mod kiosk;
pub mod qr;

#[cfg(test)]
pub mod test_support;

pub use availability::AvailabilityService;
pub use booking::{BookingService, NewBooking};
pub use kiosk::{resolve_token, KioskService, DEFAULT_KIOSK_LABEL};
pub use qr::QrService;
