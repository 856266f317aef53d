//! Integration test utilities
//!
//! Helpers for running the generation flows end to end against in-memory
//! or PostgreSQL repositories with a scripted generation backend.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
