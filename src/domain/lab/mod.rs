//! Lab aggregate

pub mod model;
pub mod repository;

pub use model::Lab;
pub use repository::LabRepository;
