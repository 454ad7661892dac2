use super::{BackendLock, StorageBackend};
use crate::error::{Result, ToondoError};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks.toon".to_string())
    }

    fn lock_path(&self) -> PathBuf {
        self.dir().join(format!(".{}.lock", self.file_name()))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ToondoError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn lock(&self) -> Result<BackendLock> {
        self.ensure_dir(&self.dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(ToondoError::Io)?;
        fs2::FileExt::lock_exclusive(&file).map_err(ToondoError::Io)?;
        Ok(BackendLock::file(file))
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ToondoError::Io(e)),
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        let dir = self.dir();
        self.ensure_dir(&dir)?;

        // Atomic Write
        let tmp_path = dir.join(format!(".{}-{}.tmp", self.file_name(), Uuid::new_v4()));
        fs::write(&tmp_path, text).map_err(ToondoError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ToondoError::Io(e));
        }

        Ok(())
    }

    fn quarantine(&self, content: &[u8]) -> Result<PathBuf> {
        let dir = self.dir();
        self.ensure_dir(&dir)?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        let target = dir.join(format!("{}.corrupt-{}", self.file_name(), stamp));
        fs::write(&target, content).map_err(ToondoError::Io)?;
        Ok(target)
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
