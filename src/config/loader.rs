// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::DagsyncConfig;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Parse a config from a TOML string without semantic validation.
pub fn from_str(contents: &str) -> Result<DagsyncConfig> {
    Ok(toml::from_str(contents)?)
}

/// Load a configuration file from a given path and return the raw config.
///
/// This only performs TOML deserialization; it does **not** check the task
/// graph. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<DagsyncConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = from_str(&contents)?;

    debug!(path = %path.display(), tasks = config.task.len(), "loaded config");
    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// Checks executor settings, `after` references, self-dependencies and
/// cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<DagsyncConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}
