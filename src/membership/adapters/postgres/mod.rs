//! `PostgreSQL` adapter for the membership oracle.

mod directory;
mod schema;

pub use directory::PostgresGroupDirectory;
