use std::sync::{Arc, Mutex};

/// Which edge of an action an [`Event`] marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub task: String,
    pub phase: Phase,
}

/// Records when task actions start and finish.
///
/// Events are appended under one mutex, so their index in the log is a total
/// order that can stand in for timestamps.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action that only records its start and finish.
    pub fn action(&self, task: &str) -> impl FnOnce() + Send + 'static {
        self.action_with(task, || {})
    }

    /// Action that records its start, runs `body`, then records its finish.
    pub fn action_with<F>(&self, task: &str, body: F) -> impl FnOnce() + Send + 'static
    where
        F: FnOnce() + Send + 'static,
    {
        let recorder = self.clone();
        let task = task.to_string();
        move || {
            recorder.push(&task, Phase::Started);
            body();
            recorder.push(&task, Phase::Finished);
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Task ids in the order their actions finished.
    pub fn finished_order(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.phase == Phase::Finished)
            .map(|e| e.task)
            .collect()
    }

    /// How many times the action for `task` started.
    pub fn run_count(&self, task: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.task == task && e.phase == Phase::Started)
            .count()
    }

    pub fn position(&self, task: &str, phase: Phase) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| e.task == task && e.phase == phase)
    }

    /// Assert that `prerequisite` finished strictly before `dependent`
    /// started.
    pub fn assert_finished_before_started(&self, prerequisite: &str, dependent: &str) {
        let finished = self
            .position(prerequisite, Phase::Finished)
            .unwrap_or_else(|| panic!("{prerequisite} never finished"));
        let started = self
            .position(dependent, Phase::Started)
            .unwrap_or_else(|| panic!("{dependent} never started"));
        assert!(
            finished < started,
            "{prerequisite} finished at #{finished} but {dependent} started at #{started}: {:?}",
            self.events()
        );
    }

    fn push(&self, task: &str, phase: Phase) {
        self.events.lock().unwrap().push(Event {
            task: task.to_string(),
            phase,
        });
    }
}
