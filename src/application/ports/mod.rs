//! Port contracts for the application registry.

pub mod repository;

pub use repository::{ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult};
