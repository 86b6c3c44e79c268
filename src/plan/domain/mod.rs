//! Domain model for plans.

mod error;
mod name;
mod plan;

pub use error::PlanDomainError;
pub use name::PlanName;
pub use plan::{PersistedPlanData, Plan, PlanSchedule};
