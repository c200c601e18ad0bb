mod common;
use crate::common::builders::{GraphBuilder, diamond};
use crate::common::recorder::Recorder;
use crate::common::{init_tracing, with_timeout, within};

use std::sync::mpsc;
use std::time::Duration;

use dagsync::{CancelSignal, Executor, ExecutorConfig, RunOutcome};

#[tokio::test]
async fn cancel_before_execute_runs_nothing() {
    init_tracing();

    let recorder = Recorder::new();
    let graph = diamond(&recorder);
    let handles: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|id| graph.get_task(id).unwrap())
        .collect();

    let cancel = CancelSignal::new();
    cancel.cancel();

    let summary =
        with_timeout(Executor::default().execute_with_cancellation(graph, cancel)).await;
    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(summary.ran, 0);

    // Every task still ends up marked done.
    for h in &handles {
        with_timeout(h.wait()).await;
    }
    assert!(recorder.events().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_mid_run_returns_without_waiting_and_skips_downstream() {
    init_tracing();

    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let recorder = Recorder::new();
    let graph = GraphBuilder::new(&recorder)
        .task_with("A", move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
        })
        .task("B")
        .task("C")
        .after("B", &["A"])
        .after("C", &["B"])
        .build();
    let a = graph.get_task("A").unwrap();
    let b = graph.get_task("B").unwrap();
    let c = graph.get_task("C").unwrap();

    let cancel = CancelSignal::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            Executor::default()
                .execute_with_cancellation(graph, cancel)
                .await
        })
    };

    tokio::task::spawn_blocking(move || started_rx.recv())
        .await
        .unwrap()
        .unwrap();
    cancel.cancel();

    // Returns while A is still blocked.
    let summary = with_timeout(run).await.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert!(!a.is_done());

    // Waiting tasks short-circuit without running.
    with_timeout(b.wait()).await;
    with_timeout(c.wait()).await;

    // Let A finish: it is not interrupted, and nothing downstream runs.
    release_tx.send(()).unwrap();
    with_timeout(a.wait()).await;
    assert_eq!(recorder.run_count("A"), 1);
    assert_eq!(recorder.run_count("B"), 0);
    assert_eq!(recorder.run_count("C"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deadline_from_config_cancels_the_run() {
    init_tracing();

    let recorder = Recorder::new();
    let graph = GraphBuilder::new(&recorder)
        .task_with("slow", || std::thread::sleep(Duration::from_millis(500)))
        .task("next")
        .after("next", &["slow"])
        .build();
    let next = graph.get_task("next").unwrap();

    let config = ExecutorConfig::default().with_deadline(Duration::from_millis(30));
    let started = std::time::Instant::now();
    let summary = with_timeout(Executor::new(config).execute(graph)).await;

    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert!(started.elapsed() < Duration::from_millis(400));

    with_timeout(next.wait()).await;
    assert_eq!(recorder.run_count("next"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unused_cancel_signal_does_not_affect_a_run() {
    let recorder = Recorder::new();
    let graph = diamond(&recorder);

    let summary = with_timeout(
        Executor::default().execute_with_cancellation(graph, CancelSignal::new()),
    )
    .await;

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.ran, 4);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deadline_leaves_callers_signal_untouched() {
    init_tracing();

    let recorder = Recorder::new();
    let graph = GraphBuilder::new(&recorder)
        .task_with("slow", || std::thread::sleep(Duration::from_millis(300)))
        .build();
    let shared = CancelSignal::new();

    let config = ExecutorConfig::default().with_deadline(Duration::from_millis(20));
    let summary = within(
        Duration::from_secs(1),
        Executor::new(config).execute_with_cancellation(graph, shared.clone()),
    )
    .await;

    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert!(!shared.is_cancelled());

    // The same signal still drives a later run to completion.
    let summary = with_timeout(
        Executor::default().execute_with_cancellation(diamond(&Recorder::new()), shared.clone()),
    )
    .await;
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.ran, 4);
}
