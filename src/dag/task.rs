// src/dag/task.rs

//! Task: a named action plus its completion signal.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::dag::signal::CompletionSignal;
use crate::types::TaskId;

/// Argument-less, side-effecting unit of work.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a task registered in a graph.
///
/// Callers can keep it around to await or inspect a task's completion while
/// the executor owns the graph.
pub type TaskHandle = Arc<Task>;

/// A named unit of work.
///
/// The action is stored behind a mutex so it can be handed out exactly once
/// via [`take_action`](Self::take_action), no matter how many handles to the
/// task exist.
pub struct Task {
    id: TaskId,
    action: Mutex<Option<Action>>,
    done: CompletionSignal,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, action: impl FnOnce() + Send + 'static) -> Self {
        let action: Action = Box::new(action);
        Self {
            id: id.into(),
            action: Mutex::new(Some(action)),
            done: CompletionSignal::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mark the task complete, waking every waiter.
    ///
    /// Idempotent; returns `true` only for the call that made the transition.
    pub fn mark_done(&self) -> bool {
        self.done.fire()
    }

    pub fn is_done(&self) -> bool {
        self.done.is_fired()
    }

    /// Wait until the task has been marked done.
    pub async fn wait(&self) {
        self.done.wait().await
    }

    /// Hand out the action. Every call after the first returns `None`.
    pub fn take_action(&self) -> Option<Action> {
        // A poisoned lock only means another taker panicked; the slot itself
        // is still consistent.
        self.action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn action_is_handed_out_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let task = Task::new("A", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let action = task.take_action().expect("first take yields the action");
        assert!(task.take_action().is_none());
        action();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mark_done_twice_is_harmless() {
        let task = Task::new("A", || {});
        assert!(task.mark_done());
        assert!(!task.mark_done());
        assert!(task.is_done());
    }
}
