//! Application services for plan management.

mod registry;

pub use registry::{PlanRegistryError, PlanRegistryResult, PlanRegistryService};
