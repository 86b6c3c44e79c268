//! Domain model for applications and their stage permissions.

mod acronym;
mod application;
mod error;
mod permissions;
mod stage;

pub use acronym::AppAcronym;
pub use application::{Application, ApplicationDetails, PersistedApplicationData};
pub use error::{ApplicationDomainError, ParseStageError};
pub use permissions::{PermissionUpdate, StagePermissions};
pub use stage::Stage;
