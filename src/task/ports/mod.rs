//! Port contracts for task persistence.

pub mod ledger;

pub use ledger::{TaskLedger, TaskLedgerError, TaskLedgerResult};
