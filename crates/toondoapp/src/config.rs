//! # Configuration
//!
//! Toondo configuration is loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `TOONDO_DATA_DIR`, `TOONDO_FILE_NAME`.
//! 2. **Config file**: `toondo.toml` in the OS-appropriate config directory
//!    (via the `directories` crate).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding `tasklists/` |
//! | `file_name` | `tasks.toon` | Name of the task list file |

use crate::error::{Result, ToondoError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toondo.toml";
pub const DEFAULT_FILE_NAME: &str = "tasks.toon";

/// Configuration for toondo, stored in `toondo.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToondoConfig {
    /// Directory holding the `tasklists/` folder. When absent, the OS data
    /// directory for toondo is used.
    #[config(env = "TOONDO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the task list file inside `tasklists/`.
    #[config(env = "TOONDO_FILE_NAME", default = "tasks.toon")]
    pub file_name: String,
}

impl Default for ToondoConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ToondoConfig {
    /// Load configuration from the environment and `config_file`, falling
    /// back to [`default_config_file`]. A missing file is not an error.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = config_file
            .map(Path::to_path_buf)
            .or_else(default_config_file)
        {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| ToondoError::Config(e.to_string()))
    }

    /// The file name, or the default when blank.
    pub fn file_name(&self) -> &str {
        let name = self.file_name.trim();
        if name.is_empty() {
            DEFAULT_FILE_NAME
        } else {
            name
        }
    }
}

/// `toondo.toml` in the OS config directory, if one can be determined.
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "toondo", "toondo").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
