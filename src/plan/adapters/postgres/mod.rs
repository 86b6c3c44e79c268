//! `PostgreSQL` adapter for the plan registry.

mod models;
mod repository;
mod schema;

pub use repository::PostgresPlanRepository;
