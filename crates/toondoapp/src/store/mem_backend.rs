use super::{BackendLock, StorageBackend};
use crate::error::{Result, ToondoError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemState {
    content: Option<Vec<u8>>,
    quarantined: Vec<Vec<u8>>,
    writes: usize,
    simulate_write_error: bool,
}

/// In-memory storage backend for testing.
///
/// Clones share the same state, so a test can keep a handle after moving the
/// backend into a store.
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Arc<Mutex<MemState>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose task file already holds `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_bytes(text.into().into_bytes())
    }

    /// A backend whose task file holds raw `bytes`, valid UTF-8 or not.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        backend.state().content = Some(bytes.into());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state().simulate_write_error = simulate;
    }

    /// Current file content, `None` if never written.
    pub fn text(&self) -> Option<String> {
        let state = self.state();
        let content = state.content.as_deref()?;
        Some(String::from_utf8_lossy(content).into_owned())
    }

    /// Current file content as raw bytes.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.state().content.clone()
    }

    /// Number of successful writes (quarantines excluded).
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Everything quarantined so far, oldest first, byte for byte.
    pub fn quarantined(&self) -> Vec<Vec<u8>> {
        self.state().quarantined.clone()
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemBackend {
    fn lock(&self) -> Result<BackendLock> {
        Ok(BackendLock::none())
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.state().content.clone())
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut state = self.state();
        if state.simulate_write_error {
            return Err(ToondoError::Store("Simulated write error".to_string()));
        }
        state.content = Some(text.as_bytes().to_vec());
        state.writes += 1;
        Ok(())
    }

    fn quarantine(&self, content: &[u8]) -> Result<PathBuf> {
        let mut state = self.state();
        if state.simulate_write_error {
            return Err(ToondoError::Store("Simulated write error".to_string()));
        }
        state.quarantined.push(content.to_vec());
        Ok(PathBuf::from(format!(
            "memory://tasks.toon.corrupt-{}",
            state.quarantined.len()
        )))
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://tasks.toon")
    }
}
