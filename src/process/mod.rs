//! Subprocess execution pipeline.
//!
//! This module provides the core "run this command, get this result" contract:
//!
//! - Ordered, append-only argument accumulation with per-token quoting
//! - Cooperative cancellation via a cloneable token
//! - Spawning with buffered in-memory output capture
//! - Guaranteed child reaping on every exit path (no orphans)

pub mod args;
pub mod cancel;
pub mod runner;

pub use args::ArgumentBuilder;
pub use cancel::CancellationToken;
pub use runner::{CANCELLED_EXIT_CODE, ExecutionResult, run};
