//! Database entities module

pub mod booking;
pub mod equipment;
pub mod lab;
pub mod qr_token;
pub mod role;
pub mod usage_log;
pub mod user;
pub mod user_role;

pub use booking::Entity as Booking;
pub use equipment::Entity as Equipment;
pub use lab::Entity as Lab;
pub use qr_token::Entity as QrToken;
pub use role::Entity as Role;
pub use usage_log::Entity as UsageLog;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
