use crate::store::fs_backend::FsBackend;
use crate::store::task_store::TaskStore;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// The default task file under this environment's data directory.
    pub fn task_file(&self) -> PathBuf {
        self.root.join("tasklists").join("tasks.toon")
    }

    /// A fresh store over the task file. Each call is a separate instance.
    pub fn store(&self) -> TaskStore<FsBackend> {
        TaskStore::with_backend(FsBackend::new(self.task_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn separate_stores_see_each_others_writes() {
        let env = TestEnv::new();
        env.store().add_task("from first").unwrap();

        let tasks = env.store().list_tasks();
        assert_eq!(tasks.len(), 1);
        assert!(fs::read_to_string(env.task_file())
            .unwrap()
            .contains("from first"));
    }
}
