//! Group membership for workflow authorization.
//!
//! The workflow engine never inspects identities itself. It asks a
//! [`ports::GroupMembership`] oracle whether a principal belongs to the group
//! an application configured for a stage. Administrator overrides are a
//! configuration policy applied by [`services::PolicyMembership`], which wraps
//! any oracle.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Policy services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
