//! Unit tests for the application registry.
