//! Unit tests for the membership context.
