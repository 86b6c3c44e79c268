//! Adapter implementations for the application registry.

pub mod memory {
    //! In-memory application repository.

    mod application;

    pub use application::InMemoryApplicationRepository;
}

pub mod postgres;
