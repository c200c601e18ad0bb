// src/exec/activity.rs

//! The per-task activity spawned by the executor.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, error, warn};

use crate::dag::TaskHandle;
use crate::dag::graph::PlannedTask;
use crate::exec::cancel::CancelSignal;

/// Counters shared by all activities of one run.
#[derive(Debug, Default)]
pub(crate) struct RunStats {
    pub(crate) ran: AtomicUsize,
    pub(crate) skipped: AtomicUsize,
    pub(crate) panicked: AtomicUsize,
}

/// Marks the task done when dropped.
///
/// Held by the activity until the action is handed to the blocking pool,
/// then moved into the blocking closure. A torn-down activity therefore never
/// reports a task done while its action is still running, and a panicking
/// action still fires the signal while unwinding.
struct DoneGuard(TaskHandle);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        if self.0.mark_done() {
            debug!(task = %self.0.id(), "task marked done");
        }
    }
}

/// Drive one task: wait for its prerequisites, run its action once, signal
/// completion.
///
/// The action runs on Tokio's blocking pool, so it may block for as long as
/// it likes without starving other activities.
pub(crate) async fn run_activity(planned: PlannedTask, cancel: CancelSignal, stats: Arc<RunStats>) {
    let PlannedTask {
        task,
        prerequisites,
    } = planned;
    let done = DoneGuard(Arc::clone(&task));

    if cancel.is_cancelled() {
        skip(&task, &stats, "cancelled before start");
        return;
    }

    for prerequisite in &prerequisites {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                skip(&task, &stats, "cancelled while waiting on prerequisites");
                return;
            }
            _ = prerequisite.wait() => {
                debug!(task = %task.id(), prerequisite = %prerequisite.id(), "prerequisite done");
            }
        }
    }

    if cancel.is_cancelled() {
        skip(&task, &stats, "cancelled after prerequisites finished");
        return;
    }

    let Some(action) = task.take_action() else {
        warn!(task = %task.id(), "action already consumed; nothing to run");
        return;
    };

    debug!(task = %task.id(), "starting action");
    let blocking = tokio::task::spawn_blocking(move || {
        let _done = done;
        action();
    });
    match blocking.await {
        Ok(()) => {
            stats.ran.fetch_add(1, Ordering::SeqCst);
            debug!(task = %task.id(), "action finished");
        }
        Err(err) => {
            stats.panicked.fetch_add(1, Ordering::SeqCst);
            error!(
                task = %task.id(),
                error = %err,
                "action panicked; marking task done so dependents are not blocked"
            );
        }
    }
}

fn skip(task: &TaskHandle, stats: &RunStats, reason: &str) {
    stats.skipped.fetch_add(1, Ordering::SeqCst);
    warn!(task = %task.id(), reason, "skipping task action");
}
