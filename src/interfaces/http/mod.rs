//! HTTP interface: router, middleware and per-feature modules

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_router, ApiDoc};
