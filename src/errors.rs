// src/errors.rs

//! Crate-wide error types.
//!
//! [`GraphError`] covers everything that can go wrong while building a
//! [`DependencyGraph`](crate::dag::DependencyGraph). [`DagsyncError`] wraps it
//! together with the config/IO failures of the surrounding layers.

use thiserror::Error;

use crate::types::TaskId;

/// Failure while building a dependency graph.
///
/// All variants are detected synchronously and leave the graph exactly as it
/// was before the failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("task '{0}' is already registered")]
    DuplicateTask(TaskId),

    #[error("unknown task '{0}'")]
    UnknownTask(TaskId),

    #[error("task '{0}' cannot depend on itself")]
    SelfDependency(TaskId),

    #[error(
        "adding '{dependent}' -> '{prerequisite}' would close a cycle: {}",
        .path.join(" -> ")
    )]
    CycleDetected {
        dependent: TaskId,
        prerequisite: TaskId,
        /// Prerequisite chain from `prerequisite` back to `dependent`.
        path: Vec<TaskId>,
    },
}

#[derive(Error, Debug)]
pub enum DagsyncError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DagsyncError>;
