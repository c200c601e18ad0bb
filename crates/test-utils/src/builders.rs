use dagsync::{DependencyGraph, UnknownTaskPolicy};

use crate::recorder::Recorder;

/// Builder for `DependencyGraph` whose actions all report to one
/// [`Recorder`].
pub struct GraphBuilder {
    graph: DependencyGraph,
    recorder: Recorder,
}

impl GraphBuilder {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            graph: DependencyGraph::new(),
            recorder: recorder.clone(),
        }
    }

    pub fn with_policy(recorder: &Recorder, policy: UnknownTaskPolicy) -> Self {
        Self {
            graph: DependencyGraph::with_policy(policy),
            recorder: recorder.clone(),
        }
    }

    /// Register a recording task.
    pub fn task(self, id: &str) -> Self {
        self.graph
            .add_task(id, self.recorder.action(id))
            .expect("Failed to add task in builder");
        self
    }

    /// Register a task that runs `body` between its start and finish events.
    pub fn task_with<F>(self, id: &str, body: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.graph
            .add_task(id, self.recorder.action_with(id, body))
            .expect("Failed to add task in builder");
        self
    }

    /// `dependent` waits for each of `prerequisites`.
    pub fn after(self, dependent: &str, prerequisites: &[&str]) -> Self {
        for prerequisite in prerequisites {
            self.graph
                .add_dependency(dependent, prerequisite)
                .expect("Failed to add dependency in builder");
        }
        self
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

/// A, B, C, D with B and C after A, and D after both B and C.
pub fn diamond(recorder: &Recorder) -> DependencyGraph {
    GraphBuilder::new(recorder)
        .task("A")
        .task("B")
        .task("C")
        .task("D")
        .after("B", &["A"])
        .after("C", &["A"])
        .after("D", &["B", "C"])
        .build()
}

/// `task_0 <- task_1 <- ... <- task_{len-1}`.
pub fn chain(recorder: &Recorder, len: usize) -> DependencyGraph {
    let mut builder = GraphBuilder::new(recorder);
    for i in 0..len {
        let id = format!("task_{i}");
        builder = builder.task(&id);
        if i > 0 {
            let prev = format!("task_{}", i - 1);
            builder = builder.after(&id, &[prev.as_str()]);
        }
    }
    builder.build()
}
