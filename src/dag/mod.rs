// src/dag/mod.rs

//! Tasks and the dependency graph that orders them.
//!
//! - [`signal`] holds the sticky one-shot completion signal.
//! - [`task`] pairs an action with its completion signal.
//! - [`graph`] is the acyclic id -> task mapping with edge validation.
//! - `cycle` is the reachability search behind cycle rejection.

mod cycle;
pub mod graph;
pub mod signal;
pub mod task;

pub use graph::DependencyGraph;
pub use signal::CompletionSignal;
pub use task::{Action, Task, TaskHandle};
