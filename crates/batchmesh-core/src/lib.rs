//! batchmesh core
//!
//! Shared utilities for the batchmesh crates: logging bootstrap, profiling scopes,
//! math re-exports, color types and hashed collections.

pub mod alloc;
pub mod color;
pub mod logging;
pub mod math;
pub mod profiling;
