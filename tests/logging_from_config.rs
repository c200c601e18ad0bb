// Runs in its own test binary: it installs the process-wide subscriber, so
// nothing here may call `init_tracing`.
mod common;
use crate::common::recorder::Recorder;

use std::error::Error;

use tracing::level_filters::LevelFilter;

use dagsync::config;
use dagsync::dag::Action;
use dagsync::logging::ensure_logging;
use dagsync::types::LogLevel;
use dagsync::{RunOutcome, run_config};

#[test]
fn configured_log_level_is_installed_by_run_config() -> Result<(), Box<dyn Error>> {
    let cfg = config::from_str(
        r#"
[executor]
log_level = "debug"

[task.A]

[task.B]
after = ["A"]
"#,
    )?;
    assert!(!tracing::dispatcher::has_been_set());

    let recorder = Recorder::new();
    let summary = run_config(&cfg, |id| Box::new(recorder.action(id)) as Action)?;

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.ran, 2);
    recorder.assert_finished_before_started("A", "B");

    assert!(tracing::dispatcher::has_been_set());
    assert_eq!(LevelFilter::current(), LevelFilter::DEBUG);

    // A second setup keeps the subscriber that is already there.
    assert!(!ensure_logging(Some(LogLevel::Error)));
    assert_eq!(LevelFilter::current(), LevelFilter::DEBUG);
    Ok(())
}
