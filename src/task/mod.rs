//! Tasks and the workflow engine that moves them.
//!
//! A task belongs to one application and is identified by the application's
//! acronym and running number. Creation and every transition are gated by
//! the group the application configured for the relevant stage; content
//! edits are not. Each mutation is committed through the ledger together
//! with its audit note.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The workflow engine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
