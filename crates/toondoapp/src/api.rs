//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Business logic belongs in `commands/*.rs`; persistence in `store/`.
//!
//! ## Generic Over StorageBackend
//!
//! `TaskApi<B: StorageBackend>` is generic over the backend:
//! - Production: `TaskApi<FsBackend>`
//! - Testing: `TaskApi<MemBackend>`
//!
//! Every method takes `&self`. The store serializes callers internally, so a
//! single `TaskApi` can be shared between threads behind an `Arc`.

use crate::commands;
use crate::error::Result;
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;
use std::path::PathBuf;

/// The main API facade for toondo operations.
pub struct TaskApi<B: StorageBackend> {
    store: TaskStore<B>,
}

impl<B: StorageBackend> TaskApi<B> {
    pub fn new(store: TaskStore<B>) -> Self {
        Self { store }
    }

    pub fn with_backend(backend: B) -> Self {
        Self::new(TaskStore::with_backend(backend))
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.store)
    }

    pub fn add_task(&self, description: &str) -> Result<commands::CmdResult> {
        commands::add::run(&self.store, description)
    }

    pub fn list_tasks(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn delete_task(&self, description: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&self.store, description)
    }

    pub fn delete_task_by_id(&self, id: &str) -> Result<commands::CmdResult> {
        commands::delete::run_by_id(&self.store, id)
    }

    pub fn doctor(&self) -> Result<commands::CmdResult> {
        commands::doctor::run(&self.store)
    }

    pub fn location(&self) -> PathBuf {
        self.store.location()
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &TaskStore<B> {
        &self.store
    }
}
