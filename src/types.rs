use std::str::FromStr;

use serde::Deserialize;

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

/// What `add_dependency` does when an edge names an unregistered task.
///
/// - `Reject` (default): fail with [`GraphError::UnknownTask`](crate::errors::GraphError::UnknownTask).
/// - `Ignore`: log a warning and return `Ok(())` without touching the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTaskPolicy {
    #[default]
    Reject,
    Ignore,
}

impl FromStr for UnknownTaskPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(UnknownTaskPolicy::Reject),
            "ignore" => Ok(UnknownTaskPolicy::Ignore),
            other => Err(format!(
                "invalid unknown_task_policy: {other} (expected \"reject\" or \"ignore\")"
            )),
        }
    }
}

/// Log verbosity accepted by [`init_logging`](crate::logging::init_logging)
/// and the `[executor].log_level` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(" Ignore ".parse(), Ok(UnknownTaskPolicy::Ignore));
        assert_eq!("REJECT".parse(), Ok(UnknownTaskPolicy::Reject));
        assert!("skip".parse::<UnknownTaskPolicy>().is_err());
    }

    #[test]
    fn log_level_accepts_warning_alias() {
        assert_eq!("warning".parse(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
