//! Astrelis Core
//!
//! Shared utilities used by the Astrelis crates: collections and the
//! generational arena, logging setup, math re-exports and profiling scopes.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
