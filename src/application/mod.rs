//! Business logic: services and the authorization seam

pub mod authorization;
pub mod services;

pub use authorization::{Actor, Role, RoleProvider, RoleSet};
pub use services::{
    resolve_token, AvailabilityService, BookingService, KioskService, NewBooking, QrService,
};
