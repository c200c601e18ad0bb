// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::DagsyncConfig;
use crate::errors::{DagsyncError, Result};
use crate::types::UnknownTaskPolicy;

/// Check a loaded config before any graph is built from it.
///
/// Catches the same problems [`DependencyGraph`](crate::dag::DependencyGraph)
/// would reject, but reports them against the config file.
pub fn validate_config(cfg: &DagsyncConfig) -> Result<()> {
    validate_executor_section(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn validate_executor_section(cfg: &DagsyncConfig) -> Result<()> {
    let exec = &cfg.executor;

    if exec.worker_threads == Some(0) {
        return Err(DagsyncError::ConfigError(
            "[executor].worker_threads must be >= 1 (got 0)".to_string(),
        ));
    }
    if exec.max_blocking_threads == Some(0) {
        return Err(DagsyncError::ConfigError(
            "[executor].max_blocking_threads must be >= 1 (got 0)".to_string(),
        ));
    }
    if exec.deadline_ms == Some(0) {
        return Err(DagsyncError::ConfigError(
            "[executor].deadline_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_task_dependencies(cfg: &DagsyncConfig) -> Result<()> {
    let reject_unknown = cfg.executor.unknown_task_policy == UnknownTaskPolicy::Reject;

    for (id, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if dep == id {
                return Err(DagsyncError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    id
                )));
            }
            if reject_unknown && !cfg.task.contains_key(dep) {
                return Err(DagsyncError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &DagsyncConfig) -> Result<()> {
    // Edge direction: prerequisite -> task. Unknown prerequisites are skipped
    // here; they only survive validation under the `ignore` policy.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in cfg.task.keys() {
        graph.add_node(id.as_str());
    }

    for (id, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if cfg.task.contains_key(dep) {
                graph.add_edge(dep.as_str(), id.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(DagsyncError::DagCycle(format!(
            "task '{}' is part of a dependency cycle",
            cycle.node_id()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TaskSpec;

    fn cfg(tasks: &[(&str, &[&str])]) -> DagsyncConfig {
        let mut cfg = DagsyncConfig::default();
        for (id, after) in tasks {
            cfg.task.insert(
                id.to_string(),
                TaskSpec {
                    after: after.iter().map(|s| s.to_string()).collect(),
                },
            );
        }
        cfg
    }

    #[test]
    fn accepts_diamond() {
        let c = cfg(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]);
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn rejects_cycle() {
        let c = cfg(&[("A", &["C"]), ("B", &["A"]), ("C", &["B"])]);
        assert!(matches!(validate_config(&c), Err(DagsyncError::DagCycle(_))));
    }

    #[test]
    fn rejects_unknown_dependency_under_reject_policy() {
        let c = cfg(&[("A", &["ghost"])]);
        assert!(matches!(validate_config(&c), Err(DagsyncError::ConfigError(_))));
    }

    #[test]
    fn tolerates_unknown_dependency_under_ignore_policy() {
        let mut c = cfg(&[("A", &["ghost"])]);
        c.executor.unknown_task_policy = UnknownTaskPolicy::Ignore;
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn rejects_self_dependency() {
        let c = cfg(&[("A", &["A"])]);
        assert!(matches!(validate_config(&c), Err(DagsyncError::ConfigError(_))));
    }

    #[test]
    fn rejects_zero_deadline() {
        let mut c = cfg(&[("A", &[])]);
        c.executor.deadline_ms = Some(0);
        assert!(matches!(validate_config(&c), Err(DagsyncError::ConfigError(_))));
    }
}
