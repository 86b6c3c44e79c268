//! Unit tests for the plan registry.
