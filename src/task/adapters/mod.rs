//! Adapter implementations for the task ledger.

pub mod memory {
    //! In-memory task ledger.

    mod ledger;

    pub use ledger::InMemoryTaskLedger;
}

pub mod postgres;
