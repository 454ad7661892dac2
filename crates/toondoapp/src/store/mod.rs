//! # Storage Layer
//!
//! The whole task list lives in one text file (see [`crate::codec`] for its
//! format). Every operation is a read-modify-write of that file:
//!
//! 1. take the store guard,
//! 2. make sure the file exists with a valid empty header,
//! 3. read and decode the whole file,
//! 4. change the task list in memory,
//! 5. encode and write the whole file back, only if something changed.
//!
//! Nothing is cached between operations.
//!
//! ## Serialization
//!
//! [`TaskStore`](task_store::TaskStore) owns its backend behind a mutex, so
//! concurrent callers sharing one store never interleave their read-modify-write
//! cycles. [`FsBackend`](fs_backend::FsBackend) also holds an advisory
//! exclusive lock on a sidecar `.lock` file for the duration of each cycle,
//! which extends the same guarantee to separate store instances and processes
//! pointing at the same file.
//!
//! ## Unreadable Files
//!
//! - `list_tasks` degrades to an empty list and logs a warning.
//! - `try_list_tasks` and `doctor` surface [`ToondoError::Corrupt`](crate::error::ToondoError::Corrupt).
//! - Mutations copy the unreadable bytes aside (quarantine) before writing a
//!   fresh list, so they are never silently destroyed. Content that is not
//!   valid UTF-8 counts as unreadable.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: the task file on disk.
//! - [`mem_backend::MemBackend`]: in memory, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/tasklists/
//! ├── tasks.toon                       # The task list
//! ├── .tasks.toon.lock                 # Advisory lock file
//! └── tasks.toon.corrupt-<timestamp>   # Quarantined unreadable content
//! ```

use crate::error::Result;
use std::fs::File;
use std::path::PathBuf;

pub mod fs_backend;
pub mod mem_backend;
pub mod task_store;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// The task file was missing or blank and has been created.
    pub created_file: bool,
    /// Unreadable content was moved here and the list reset.
    pub quarantined_to: Option<PathBuf>,
    /// The header's row count disagreed with the rows present.
    pub fixed_header_count: bool,
    /// The file was rewritten in canonical form.
    pub normalized: bool,
    pub task_count: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        !self.created_file && self.quarantined_to.is_none() && !self.normalized
    }
}

/// Exclusive access to a backend for one read-modify-write cycle.
///
/// Released on drop.
pub struct BackendLock {
    file: Option<File>,
}

impl BackendLock {
    /// A lock with nothing to release, for backends that are not shared.
    pub fn none() -> Self {
        Self { file: None }
    }

    pub(crate) fn file(file: File) -> Self {
        Self { file: Some(file) }
    }
}

impl Drop for BackendLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = fs2::FileExt::unlock(file);
        }
    }
}

/// Raw I/O for the task file.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `TaskStore` handles the "what" (decode, task semantics, recovery).
pub trait StorageBackend: Send {
    /// Block until this caller holds exclusive access to the task file.
    fn lock(&self) -> Result<BackendLock>;

    /// Read the whole task file as raw bytes; decoding is the store's job.
    /// Returns Ok(None) if it does not exist yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the whole task file, creating its directory if needed.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, text: &str) -> Result<()>;

    /// Keep a byte-for-byte copy of unreadable content; returns where it was put.
    fn quarantine(&self, content: &[u8]) -> Result<PathBuf>;

    /// Where the task file lives.
    fn location(&self) -> PathBuf;
}
