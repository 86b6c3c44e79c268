//! Taskboard: a multi-tenant task workflow engine.
//!
//! Administrators register applications and decide which user group may
//! perform each workflow stage. Users create tasks and move them through a
//! fixed five-state workflow; every move is authorized against the
//! application's permissions and recorded in an append-only audit trail.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: validated types and the rules that govern them
//! - **Ports**: traits for storage and the membership oracle
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//! - **Services**: orchestration that callers use directly
//!
//! # Modules
//!
//! - [`membership`]: principals, groups, and the membership oracle
//! - [`application`]: applications, stage permissions, and task numbering
//! - [`plan`]: milestones that tasks may reference
//! - [`task`]: tasks, the audit ledger, and the workflow engine
//! - [`config`] and [`telemetry`]: runtime configuration and logging
//! - [`database`]: the shared `PostgreSQL` pool

pub mod application;
pub mod config;
pub mod database;
pub mod error;
pub mod membership;
pub mod plan;
pub mod task;
pub mod telemetry;
