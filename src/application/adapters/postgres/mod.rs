//! `PostgreSQL` adapter for the application registry.

mod models;
mod repository;
mod schema;

pub use repository::PostgresApplicationRepository;
