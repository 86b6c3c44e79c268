//! Plan registry: named milestones within an application.
//!
//! Tasks refer to plans by name only. Renaming or removing a plan never
//! cascades, and a task may keep a reference to a plan that no longer exists.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
