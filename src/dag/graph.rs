// src/dag/graph.rs

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::dag::cycle::prerequisite_path;
use crate::dag::task::{Action, Task, TaskHandle};
use crate::errors::GraphError;
use crate::types::{TaskId, UnknownTaskPolicy};

/// Internal node structure: the task plus its immediate edges.
#[derive(Debug)]
pub(crate) struct DagNode {
    pub(crate) task: TaskHandle,
    /// Direct prerequisites: tasks that must finish before this one starts.
    pub(crate) prerequisites: Vec<TaskId>,
    /// Direct dependents: tasks that list this one as a prerequisite.
    pub(crate) dependents: Vec<TaskId>,
}

/// A task together with handles to everything it waits on.
///
/// Produced by [`DependencyGraph::into_plan`] once building is over.
#[derive(Debug)]
pub(crate) struct PlannedTask {
    pub(crate) task: TaskHandle,
    pub(crate) prerequisites: Vec<TaskHandle>,
}

/// Acyclic collection of tasks keyed by id.
///
/// All mutation goes through one exclusive lock, and the cycle check for a
/// new edge runs under the same write guard as the insertion, so a graph can
/// be built from several threads at once without a check-then-act race.
/// Execution consumes the graph; no edge can change during a run.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: RwLock<BTreeMap<TaskId, DagNode>>,
    policy: UnknownTaskPolicy,
}

impl DependencyGraph {
    /// Empty graph that rejects edges naming unknown tasks.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnknownTaskPolicy) -> Self {
        Self {
            nodes: RwLock::default(),
            policy,
        }
    }

    /// Build a graph from a task list and a `dependent -> prerequisites` map
    /// in one go, rejecting unknown ids.
    ///
    /// Stops at the first error; the partially built graph is dropped.
    pub fn from_parts<T, D, P>(tasks: T, dependencies: D) -> Result<Self, GraphError>
    where
        T: IntoIterator<Item = (TaskId, Action)>,
        D: IntoIterator<Item = (TaskId, P)>,
        P: IntoIterator<Item = TaskId>,
    {
        Self::from_parts_with_policy(tasks, dependencies, UnknownTaskPolicy::default())
    }

    /// [`from_parts`](Self::from_parts) with an explicit [`UnknownTaskPolicy`].
    pub fn from_parts_with_policy<T, D, P>(
        tasks: T,
        dependencies: D,
        policy: UnknownTaskPolicy,
    ) -> Result<Self, GraphError>
    where
        T: IntoIterator<Item = (TaskId, Action)>,
        D: IntoIterator<Item = (TaskId, P)>,
        P: IntoIterator<Item = TaskId>,
    {
        let graph = Self::with_policy(policy);
        for (id, action) in tasks {
            graph.add_task(id, action)?;
        }
        for (dependent, prerequisites) in dependencies {
            for prerequisite in prerequisites {
                graph.add_dependency(&dependent, &prerequisite)?;
            }
        }
        Ok(graph)
    }

    pub fn policy(&self) -> UnknownTaskPolicy {
        self.policy
    }

    /// Register a new task.
    ///
    /// Fails with [`GraphError::DuplicateTask`] if `id` is taken; the
    /// existing task is left untouched.
    pub fn add_task(
        &self,
        id: impl Into<TaskId>,
        action: impl FnOnce() + Send + 'static,
    ) -> Result<TaskHandle, GraphError> {
        let id = id.into();
        let mut nodes = self.write();

        if nodes.contains_key(&id) {
            return Err(GraphError::DuplicateTask(id));
        }

        let task = Arc::new(Task::new(id.clone(), action));
        nodes.insert(
            id.clone(),
            DagNode {
                task: Arc::clone(&task),
                prerequisites: Vec::new(),
                dependents: Vec::new(),
            },
        );
        debug!(task = %id, "registered task");

        Ok(task)
    }

    /// Declare that `dependent` must not start before `prerequisite` has
    /// completed.
    ///
    /// Rejects unknown ids (per [`UnknownTaskPolicy`]), self-dependencies and
    /// edges that would close a cycle. On any error the graph is unchanged.
    /// Declaring an existing edge again is a no-op.
    pub fn add_dependency(&self, dependent: &str, prerequisite: &str) -> Result<(), GraphError> {
        let mut nodes = self.write();

        for id in [dependent, prerequisite] {
            if !nodes.contains_key(id) {
                match self.policy {
                    UnknownTaskPolicy::Reject => {
                        return Err(GraphError::UnknownTask(id.to_string()));
                    }
                    UnknownTaskPolicy::Ignore => {
                        warn!(
                            task = %id,
                            dependent = %dependent,
                            prerequisite = %prerequisite,
                            "dependency references unknown task; ignoring"
                        );
                        return Ok(());
                    }
                }
            }
        }

        if dependent == prerequisite {
            return Err(GraphError::SelfDependency(dependent.to_string()));
        }

        let already_present = nodes
            .get(dependent)
            .is_some_and(|n| n.prerequisites.iter().any(|p| p == prerequisite));
        if already_present {
            debug!(dependent = %dependent, prerequisite = %prerequisite, "edge already present");
            return Ok(());
        }

        // Would `dependent` become reachable from itself?
        if let Some(chain) = prerequisite_path(&nodes, prerequisite, dependent) {
            let mut path = Vec::with_capacity(chain.len() + 1);
            path.push(dependent.to_string());
            path.extend(chain);
            return Err(GraphError::CycleDetected {
                dependent: dependent.to_string(),
                prerequisite: prerequisite.to_string(),
                path,
            });
        }

        if let Some(node) = nodes.get_mut(dependent) {
            node.prerequisites.push(prerequisite.to_string());
        }
        if let Some(node) = nodes.get_mut(prerequisite) {
            node.dependents.push(dependent.to_string());
        }
        debug!(dependent = %dependent, prerequisite = %prerequisite, "added dependency");

        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Option<TaskHandle> {
        self.read().get(id).map(|n| Arc::clone(&n.task))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All task ids, sorted.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.read().keys().cloned().collect()
    }

    /// Immediate prerequisites of a task, in declaration order.
    ///
    /// Unknown ids yield an empty list.
    pub fn prerequisites_of(&self, id: &str) -> Vec<TaskId> {
        self.read()
            .get(id)
            .map(|n| n.prerequisites.clone())
            .unwrap_or_default()
    }

    /// Immediate dependents of a task, in declaration order.
    pub fn dependents_of(&self, id: &str) -> Vec<TaskId> {
        self.read()
            .get(id)
            .map(|n| n.dependents.clone())
            .unwrap_or_default()
    }

    /// Tasks with no prerequisites; these start immediately on execution.
    pub fn roots(&self) -> Vec<TaskId> {
        self.read()
            .iter()
            .filter(|(_, n)| n.prerequisites.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// One valid execution order (prerequisites first).
    ///
    /// The graph is acyclic by construction, so this only fails if that
    /// invariant has somehow been broken.
    pub fn topological_order(&self) -> Result<Vec<TaskId>, GraphError> {
        let nodes = self.read();

        // Edge direction: prerequisite -> dependent.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for (id, node) in nodes.iter() {
            graph.add_node(id.as_str());
            for prerequisite in &node.prerequisites {
                graph.add_edge(prerequisite.as_str(), id.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
            Err(cycle) => {
                let node = cycle.node_id().to_string();
                Err(GraphError::CycleDetected {
                    dependent: node.clone(),
                    prerequisite: node.clone(),
                    path: vec![node],
                })
            }
        }
    }

    /// Consume the graph and resolve every prerequisite id into a handle.
    pub(crate) fn into_plan(self) -> Vec<PlannedTask> {
        let nodes = self
            .nodes
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        nodes
            .values()
            .map(|node| PlannedTask {
                task: Arc::clone(&node.task),
                prerequisites: node
                    .prerequisites
                    .iter()
                    .filter_map(|p| nodes.get(p).map(|n| Arc::clone(&n.task)))
                    .collect(),
            })
            .collect()
    }

    // Every mutation keeps the map consistent before it can panic, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<TaskId, DagNode>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<TaskId, DagNode>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }
}
