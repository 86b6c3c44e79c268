//! Port contracts for the plan registry.

pub mod repository;

pub use repository::{PlanRepository, PlanRepositoryError, PlanRepositoryResult};
