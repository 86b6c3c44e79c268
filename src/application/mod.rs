//! Application registry for the task tracker.
//!
//! An application is a project that owns tasks and plans. It records which
//! user-group may perform each workflow stage and carries the running number
//! used to mint task identifiers. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
