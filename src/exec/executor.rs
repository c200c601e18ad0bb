// src/exec/executor.rs

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::ExecutorConfig;
use crate::dag::DependencyGraph;
use crate::exec::activity::{RunStats, run_activity};
use crate::exec::cancel::CancelSignal;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every activity finished.
    Completed,
    /// Cancellation was observed before every activity finished. Some
    /// activities may still be finishing in the background.
    Cancelled,
}

/// Snapshot of a run, taken when the executor returns.
///
/// For a cancelled run, `ran + skipped + panicked` may be less than `total`:
/// stragglers are counted only if they resolved before the executor returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub outcome: RunOutcome,
    pub total: usize,
    /// Actions that ran to completion.
    pub ran: usize,
    /// Tasks that were marked done without running their action.
    pub skipped: usize,
    /// Actions that panicked.
    pub panicked: usize,
}

/// Runs every task of a [`DependencyGraph`] concurrently, one activity per
/// task, honoring prerequisite order.
///
/// Each activity waits for its prerequisites' completion signals, runs its
/// action once, and fires its own signal. The executor joins all of them or
/// returns early on cancellation. Running actions are never interrupted.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the whole graph and return once every task has finished.
    ///
    /// If the config sets a deadline, the run is cancelled when it elapses.
    pub async fn execute(&self, graph: DependencyGraph) -> ExecutionSummary {
        self.execute_with_cancellation(graph, CancelSignal::new()).await
    }

    /// Like [`execute`](Self::execute), but returns as soon as `cancel` fires,
    /// without waiting for stragglers.
    ///
    /// A configured deadline cancels only this run; `cancel` itself is never
    /// cancelled by the executor.
    ///
    /// Tasks still waiting on prerequisites observe the cancellation, mark
    /// themselves done and never run their action.
    pub async fn execute_with_cancellation(
        &self,
        graph: DependencyGraph,
        cancel: CancelSignal,
    ) -> ExecutionSummary {
        // The deadline cancels this run only, never the caller's signal.
        let (run_cancel, link) = cancel.child();
        let deadline = self
            .config
            .deadline()
            .map(|timeout| run_cancel.cancel_after(timeout));

        let summary = drive(graph, run_cancel).await;

        link.abort();
        if let Some(deadline) = deadline {
            deadline.abort();
        }
        summary
    }
}

async fn drive(graph: DependencyGraph, cancel: CancelSignal) -> ExecutionSummary {
    let plan = graph.into_plan();
    let total = plan.len();
    let stats = Arc::new(RunStats::default());

    info!(tasks = total, "starting graph execution");

    let mut activities = JoinSet::new();
    for planned in plan {
        activities.spawn(run_activity(planned, cancel.clone(), Arc::clone(&stats)));
    }

    let outcome = loop {
        tokio::select! {
            biased;
            joined = activities.join_next() => match joined {
                None => break RunOutcome::Completed,
                Some(Ok(())) => {}
                Some(Err(err)) => error!(error = %err, "task activity failed to join"),
            },
            _ = cancel.cancelled() => break RunOutcome::Cancelled,
        }
    };

    if outcome == RunOutcome::Cancelled {
        let pending = activities.len();
        // Dropping the set would abort the activities; let them wind down.
        activities.detach_all();
        warn!(pending, "cancellation observed; returning without waiting for remaining tasks");
    }

    let summary = ExecutionSummary {
        outcome,
        total,
        ran: stats.ran.load(Ordering::SeqCst),
        skipped: stats.skipped.load(Ordering::SeqCst),
        panicked: stats.panicked.load(Ordering::SeqCst),
    };
    info!(?summary, "graph execution finished");
    summary
}
