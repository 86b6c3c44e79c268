//! Identity value types shared by every bounded context.

mod error;
mod group;
mod principal;

pub use error::MembershipDomainError;
pub use group::GroupName;
pub use principal::Principal;
