//! Adapter implementations for the plan registry.

pub mod memory {
    //! In-memory plan repository.

    mod plan;

    pub use plan::InMemoryPlanRepository;
}

pub mod postgres;
