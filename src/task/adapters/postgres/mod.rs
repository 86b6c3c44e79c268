//! `PostgreSQL` adapter for the task ledger.

mod ledger;
mod models;
mod schema;

pub use ledger::PostgresTaskLedger;
