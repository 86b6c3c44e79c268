//! Application services for registry administration.

mod registry;

pub use registry::{
    ApplicationRegistryError, ApplicationRegistryResult, ApplicationRegistryService,
    CreateApplicationRequest,
};
