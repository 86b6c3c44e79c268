//! Adapter implementations for the membership oracle.

pub mod memory {
    //! In-memory group directory.

    mod directory;

    pub use directory::InMemoryGroupDirectory;
}

pub mod postgres;
