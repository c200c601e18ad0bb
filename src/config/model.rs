// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::dag::{Action, DependencyGraph};
use crate::errors::GraphError;
use crate::types::{LogLevel, TaskId, UnknownTaskPolicy};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [executor]
/// worker_threads = 4
/// deadline_ms = 5000
/// unknown_task_policy = "reject"
///
/// [task.A]
///
/// [task.B]
/// after = ["A"]
/// ```
///
/// Both sections are optional. The `[task.<id>]` tables only describe the
/// graph's shape; actions are bound in code via [`DagsyncConfig::build_graph`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DagsyncConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Keys are task ids.
    #[serde(default)]
    pub task: BTreeMap<TaskId, TaskSpec>,
}

/// `[executor]` section: how a graph is run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutorConfig {
    /// Tokio worker threads for the blocking entry points. Tokio's default
    /// (one per core) when unset.
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Upper bound on threads running task actions concurrently.
    #[serde(default)]
    pub max_blocking_threads: Option<usize>,

    /// Cancel the run once this many milliseconds have passed.
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    #[serde(default)]
    pub unknown_task_policy: UnknownTaskPolicy,

    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl ExecutorConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    pub fn with_worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = Some(n);
        self
    }
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskSpec {
    /// Prerequisites: tasks that must finish before this one starts.
    #[serde(default)]
    pub after: Vec<TaskId>,
}

impl DagsyncConfig {
    /// Build a [`DependencyGraph`] with this config's shape, asking
    /// `action_for` for each task's action.
    ///
    /// Tasks are registered in id order, then edges in the order they appear
    /// in each `after` list.
    pub fn build_graph<F>(&self, mut action_for: F) -> Result<DependencyGraph, GraphError>
    where
        F: FnMut(&str) -> Action,
    {
        let graph = DependencyGraph::with_policy(self.executor.unknown_task_policy);

        for id in self.task.keys() {
            graph.add_task(id.clone(), action_for(id))?;
        }

        for (id, spec) in self.task.iter() {
            for prerequisite in spec.after.iter() {
                graph.add_dependency(id, prerequisite)?;
            }
        }

        Ok(graph)
    }
}
