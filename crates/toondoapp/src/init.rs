//! # Locating the Task List
//!
//! The task file lives at `<data_dir>/tasklists/<file_name>`. The data
//! directory is resolved in priority order:
//!
//! 1. An explicit override (the CLI's `--data` flag).
//! 2. `data_dir` from [`ToondoConfig`] (config file or `TOONDO_DATA_DIR`).
//! 3. The OS-appropriate data directory (via the `directories` crate).
//!
//! [`initialize`] does the resolution and wires up a [`TaskApi`] over the
//! filesystem backend. It does not touch the disk; the task file is created
//! lazily by the first operation.

use crate::api::TaskApi;
use crate::config::ToondoConfig;
use crate::error::{Result, ToondoError};
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use log::debug;
use std::path::{Path, PathBuf};

pub const TASKLIST_DIR: &str = "tasklists";

pub struct ToondoContext {
    pub api: TaskApi<FsBackend>,
    pub config: ToondoConfig,
}

/// Resolve the task file path for a data directory.
pub fn task_file_path(data_dir: &Path, config: &ToondoConfig) -> PathBuf {
    data_dir.join(TASKLIST_DIR).join(config.file_name())
}

/// Resolve the data directory: override, then config, then the OS default.
pub fn resolve_data_dir(data_override: Option<PathBuf>, config: &ToondoConfig) -> Result<PathBuf> {
    if let Some(dir) = data_override.or_else(|| config.data_dir.clone()) {
        return Ok(dir);
    }
    ProjectDirs::from("com", "toondo", "toondo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ToondoError::Config("Could not determine a data directory".to_string()))
}

/// Load configuration and build the context with the default config file.
pub fn initialize(data_override: Option<PathBuf>) -> Result<ToondoContext> {
    let config = ToondoConfig::load(None)?;
    initialize_with_config(data_override, config)
}

/// Build the context from an already loaded configuration.
pub fn initialize_with_config(
    data_override: Option<PathBuf>,
    config: ToondoConfig,
) -> Result<ToondoContext> {
    let data_dir = resolve_data_dir(data_override, &config)?;
    let path = task_file_path(&data_dir, &config);
    debug!("task list at {}", path.display());

    let api = TaskApi::with_backend(FsBackend::new(path));
    Ok(ToondoContext { api, config })
}
