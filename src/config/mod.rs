// src/config/mod.rs

//! Configuration loading and validation for dagsync.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate executor settings and the declared task graph (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{from_str, load_and_validate, load_from_path};
pub use model::{DagsyncConfig, ExecutorConfig, TaskSpec};
pub use validate::validate_config;
