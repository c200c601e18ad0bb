// src/exec/mod.rs

//! Concurrent execution layer.
//!
//! - [`executor`] owns the run: it spawns one activity per task, joins them,
//!   and returns early on cancellation.
//! - `activity` is the per-task routine (wait on prerequisites, run the
//!   action on the blocking pool, signal completion).
//! - [`cancel`] provides the shared cancellation signal and deadlines.
//! - [`runtime`] builds the Tokio runtime used by the blocking entry points.

mod activity;
pub mod cancel;
pub mod executor;
pub mod runtime;

pub use cancel::CancelSignal;
pub use executor::{ExecutionSummary, Executor, RunOutcome};
pub use runtime::build_runtime;
