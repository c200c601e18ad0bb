// src/exec/runtime.rs

//! Tokio runtime construction for the blocking entry points.

use tokio::runtime::{Builder, Runtime};

use crate::config::ExecutorConfig;
use crate::errors::{DagsyncError, Result};

/// Build a multi-threaded runtime sized according to `config`.
pub fn build_runtime(config: &ExecutorConfig) -> Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all().thread_name("dagsync-worker");

    if let Some(n) = config.worker_threads {
        if n == 0 {
            return Err(DagsyncError::ConfigError(
                "worker_threads must be >= 1 (got 0)".to_string(),
            ));
        }
        builder.worker_threads(n);
    }

    if let Some(n) = config.max_blocking_threads {
        if n == 0 {
            return Err(DagsyncError::ConfigError(
                "max_blocking_threads must be >= 1 (got 0)".to_string(),
            ));
        }
        builder.max_blocking_threads(n);
    }

    Ok(builder.build()?)
}
