// src/lib.rs

//! Dependency-graph task scheduler.
//!
//! Register named tasks in a [`DependencyGraph`], declare which tasks must
//! finish before others start, then hand the graph to an [`Executor`]. Every
//! task runs exactly once, concurrently wherever the graph allows, and never
//! before all of its prerequisites have completed.
//!
//! ```no_run
//! use dagsync::{DependencyGraph, execute_blocking};
//!
//! let graph = DependencyGraph::new();
//! graph.add_task("fetch", || println!("fetch"))?;
//! graph.add_task("build", || println!("build"))?;
//! graph.add_dependency("build", "fetch")?;
//!
//! let summary = execute_blocking(graph)?;
//! assert_eq!(summary.ran, 2);
//! # Ok::<(), dagsync::errors::DagsyncError>(())
//! ```
//!
//! Cancellation ([`CancelSignal`]) stops tasks that have not started yet and
//! lets the executor return early. It never interrupts an action that is
//! already running.

pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use tracing::debug;

pub use crate::config::{DagsyncConfig, ExecutorConfig};
pub use crate::dag::{Action, CompletionSignal, DependencyGraph, Task, TaskHandle};
pub use crate::errors::{DagsyncError, GraphError, Result};
pub use crate::exec::{CancelSignal, ExecutionSummary, Executor, RunOutcome};
pub use crate::types::{TaskId, UnknownTaskPolicy};

/// Run `graph` on a dedicated Tokio runtime built from `config`, blocking the
/// calling thread until the run ends.
///
/// Must not be called from inside an async context. If the run is cancelled
/// (e.g. by `deadline_ms`), the runtime is shut down in the background so
/// actions that are still running do not hold up the caller.
pub fn run_blocking(graph: DependencyGraph, config: &ExecutorConfig) -> Result<ExecutionSummary> {
    let runtime = exec::build_runtime(config)?;
    let executor = Executor::new(config.clone());

    let summary = runtime.block_on(executor.execute(graph));

    if summary.outcome == RunOutcome::Cancelled {
        debug!("run cancelled; shutting runtime down in the background");
        runtime.shutdown_background();
    }

    Ok(summary)
}

/// [`run_blocking`] with the default executor config.
pub fn execute_blocking(graph: DependencyGraph) -> Result<ExecutionSummary> {
    run_blocking(graph, &ExecutorConfig::default())
}

/// Run the graph described by a loaded config.
///
/// Installs logging at `[executor].log_level` unless the process already has
/// a subscriber, validates the config, binds actions through `action_for`,
/// then runs like [`run_blocking`].
pub fn run_config<F>(config: &DagsyncConfig, action_for: F) -> Result<ExecutionSummary>
where
    F: FnMut(&str) -> Action,
{
    logging::ensure_logging(config.executor.log_level);
    config::validate_config(config)?;

    let graph = config.build_graph(action_for)?;
    run_blocking(graph, &config.executor)
}
