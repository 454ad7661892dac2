use super::{DoctorReport, StorageBackend};
use crate::codec::{self, FormatError};
use crate::error::{Result, ToondoError};
use crate::model::{tasks_document, tasks_document_with_fields, Task, TASK_COLLECTION};
use log::{debug, error, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The decoded state of the task file at the start of an operation.
#[derive(Default)]
struct Snapshot {
    /// Fields the header declares, in order. Rewrites keep them.
    fields: Vec<String>,
    tasks: Vec<Task>,
    /// Raw bytes and the reason they could not be decoded.
    unreadable: Option<(Vec<u8>, FormatError)>,
}

/// Task list persistence over a [`StorageBackend`].
///
/// The backend sits behind a mutex and is only reachable through the methods
/// below, each of which holds the mutex (and the backend's own lock) for one
/// full read-modify-write cycle. Share a store between threads with `Arc`.
pub struct TaskStore<B: StorageBackend> {
    backend: Mutex<B>,
}

impl<B: StorageBackend> TaskStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Where the task list lives.
    pub fn location(&self) -> PathBuf {
        self.backend().location()
    }

    /// Create the task file with an empty list if it is missing or blank.
    /// Returns whether anything was written.
    pub fn ensure_initialized(&self) -> Result<bool> {
        self.locked(|backend| Self::init(backend))
    }

    /// All tasks in file order. Any failure is logged and yields an empty list.
    pub fn list_tasks(&self) -> Vec<Task> {
        match self.try_list_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("listing tasks failed, showing an empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// All tasks in file order, failing with [`ToondoError::Corrupt`] when the
    /// file cannot be decoded.
    pub fn try_list_tasks(&self) -> Result<Vec<Task>> {
        self.locked(|backend| {
            let snapshot = Self::snapshot(backend)?;
            match snapshot.unreadable {
                Some((_, source)) => Err(ToondoError::Corrupt {
                    path: backend.location(),
                    source,
                }),
                None => Ok(snapshot.tasks),
            }
        })
    }

    /// Append a new pending task and return it.
    pub fn add_task(&self, description: &str) -> Result<Task> {
        self.mutate("add", |tasks| {
            let task = Task::new(description);
            tasks.push(task.clone());
            (task, true)
        })
    }

    /// Remove every task whose description matches (whitespace-trimmed).
    /// Returns how many were removed; the file is untouched when none match.
    pub fn delete_task(&self, description: &str) -> Result<usize> {
        self.mutate("delete", |tasks| {
            let before = tasks.len();
            tasks.retain(|t| !t.matches_description(description));
            let removed = before - tasks.len();
            (removed, removed > 0)
        })
    }

    /// Remove the task with this id, if there is one.
    pub fn delete_task_by_id(&self, id: &str) -> Result<Option<Task>> {
        self.mutate("delete by id", |tasks| {
            match tasks.iter().position(|t| t.id == id) {
                Some(pos) => (Some(tasks.remove(pos)), true),
                None => (None, false),
            }
        })
    }

    /// Repair the task file: create it, quarantine unreadable content, or
    /// rewrite it in canonical form.
    pub fn doctor(&self) -> Result<DoctorReport> {
        self.locked(|backend| {
            let mut report = DoctorReport {
                created_file: Self::init(backend)?,
                ..Default::default()
            };
            let bytes = backend.read()?.unwrap_or_default();

            match decode_tasks(&bytes) {
                Err(reason) => {
                    let target = backend.quarantine(&bytes)?;
                    warn!(
                        "doctor: task list unreadable ({}), moved to {}",
                        reason,
                        target.display()
                    );
                    backend.write(&codec::encode(&tasks_document(&[])?))?;
                    report.quarantined_to = Some(target);
                }
                Ok(Snapshot { fields, tasks, .. }) => {
                    let canonical = codec::encode(&tasks_document_with_fields(&tasks, &fields)?);
                    if canonical.as_bytes() != bytes.as_slice() {
                        report.fixed_header_count = std::str::from_utf8(&bytes)
                            .ok()
                            .and_then(|text| codec::peek_header(text).ok())
                            .map(|h| h.count != tasks.len())
                            .unwrap_or(false);
                        report.normalized = true;
                        backend.write(&canonical)?;
                        debug!("doctor: rewrote {} in canonical form", backend.location().display());
                    }
                    report.task_count = tasks.len();
                }
            }

            Ok(report)
        })
    }

    /// Run `op` with exclusive access to the backend.
    fn locked<T>(&self, op: impl FnOnce(&B) -> Result<T>) -> Result<T> {
        let backend = self.backend();
        let _file_lock = backend.lock()?;
        op(&backend)
    }

    fn backend(&self) -> MutexGuard<'_, B> {
        // The guarded state lives on disk, so a panic in another holder
        // leaves nothing half-updated in memory.
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One read-modify-write cycle. `change` returns its result and whether
    /// the list was modified; unmodified lists are not written back.
    fn mutate<T>(
        &self,
        action: &str,
        change: impl FnOnce(&mut Vec<Task>) -> (T, bool),
    ) -> Result<T> {
        self.locked(|backend| {
            let Snapshot {
                fields,
                mut tasks,
                unreadable,
            } = Self::snapshot(backend)?;

            let (outcome, changed) = change(&mut tasks);
            if !changed {
                debug!("{}: nothing changed, skipping write", action);
                return Ok(outcome);
            }

            if let Some((bytes, reason)) = &unreadable {
                let target = backend.quarantine(bytes).map_err(|e| {
                    error!("{}: could not preserve unreadable task list: {}", action, e);
                    ToondoError::NotPersisted(Box::new(e))
                })?;
                warn!(
                    "{}: task list was unreadable ({}), moved to {}",
                    action,
                    reason,
                    target.display()
                );
            }

            let text = codec::encode(&tasks_document_with_fields(&tasks, &fields)?);
            backend.write(&text).map_err(|e| {
                error!(
                    "{}: writing {} failed: {}",
                    action,
                    backend.location().display(),
                    e
                );
                ToondoError::NotPersisted(Box::new(e))
            })?;
            debug!("{}: saved {} task(s)", action, tasks.len());
            Ok(outcome)
        })
    }

    fn init(backend: &B) -> Result<bool> {
        match backend.read()? {
            Some(bytes) if !is_blank(&bytes) => Ok(false),
            _ => {
                backend.write(&codec::encode(&tasks_document(&[])?))?;
                debug!("initialized empty task list at {}", backend.location().display());
                Ok(true)
            }
        }
    }

    fn snapshot(backend: &B) -> Result<Snapshot> {
        Self::init(backend)?;
        let bytes = backend.read()?.unwrap_or_default();
        Ok(decode_tasks(&bytes).unwrap_or_else(|reason| Snapshot {
            unreadable: Some((bytes, reason)),
            ..Default::default()
        }))
    }
}

/// Missing files, whitespace-only files and empty files are uninitialized.
/// Undecodable bytes are not blank.
fn is_blank(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok_and(|text| text.trim().is_empty())
}

fn decode_tasks(bytes: &[u8]) -> std::result::Result<Snapshot, FormatError> {
    let doc = codec::try_decode_bytes(bytes)?;
    let records = doc
        .collection(TASK_COLLECTION)
        .ok_or_else(|| FormatError::UnexpectedCollection {
            expected: TASK_COLLECTION.to_string(),
            found: doc.name().to_string(),
        })?;
    Ok(Snapshot {
        fields: doc.fields().to_vec(),
        tasks: records.iter().map(Task::from_record).collect(),
        unreadable: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use crate::store::mem_backend::MemBackend;

    const EMPTY: &str = "tasks[0]{id,description,status,created_at}:\n";

    fn make_store() -> (TaskStore<MemBackend>, MemBackend) {
        let backend = MemBackend::new();
        (TaskStore::with_backend(backend.clone()), backend)
    }

    fn descriptions(store: &TaskStore<MemBackend>) -> Vec<String> {
        store
            .list_tasks()
            .into_iter()
            .map(|t| t.description)
            .collect()
    }

    // --- Initialization Tests ---

    #[test]
    fn test_initialize_writes_empty_header() {
        let (store, backend) = make_store();
        assert!(store.ensure_initialized().unwrap());
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (store, backend) = make_store();
        store.ensure_initialized().unwrap();
        let first = backend.text();

        assert!(!store.ensure_initialized().unwrap());
        assert_eq!(backend.text(), first);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_initialize_fills_blank_file() {
        let backend = MemBackend::with_text("  \n");
        let store = TaskStore::with_backend(backend.clone());
        assert!(store.ensure_initialized().unwrap());
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
    }

    #[test]
    fn test_list_initializes_missing_file() {
        let (store, backend) = make_store();
        assert!(store.list_tasks().is_empty());
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
    }

    // --- Add Tests ---

    #[test]
    fn test_add_returns_pending_task() {
        let (store, _) = make_store();
        let task = store.add_task("write spec").unwrap();

        assert_eq!(task.description, "write spec");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.id.is_empty());
        assert!(!task.created_at.is_empty());
        assert_eq!(store.list_tasks(), vec![task]);
    }

    #[test]
    fn test_add_preserves_order() {
        let (store, _) = make_store();
        store.add_task("x").unwrap();
        store.add_task("y").unwrap();
        assert_eq!(descriptions(&store), vec!["x", "y"]);
    }

    #[test]
    fn test_add_writes_real_row_count() {
        let (store, backend) = make_store();
        store.add_task("one").unwrap();
        store.add_task("two").unwrap();
        assert!(backend.text().unwrap().starts_with("tasks[2]{"));
    }

    // --- Delete Tests ---

    #[test]
    fn test_delete_removes_all_matches_and_only_matches() {
        let (store, _) = make_store();
        store.add_task("buy milk").unwrap();
        store.add_task("buy milk").unwrap();
        store.add_task("walk dog").unwrap();

        assert_eq!(store.delete_task("buy milk").unwrap(), 2);
        assert_eq!(descriptions(&store), vec!["walk dog"]);
    }

    #[test]
    fn test_delete_trims_whitespace() {
        let (store, _) = make_store();
        store.add_task(" walk dog ").unwrap();
        assert_eq!(store.delete_task("walk dog\n").unwrap(), 1);
        assert!(store.list_tasks().is_empty());
    }

    #[test]
    fn test_noop_delete_does_not_write() {
        let (store, backend) = make_store();
        store.add_task("keep me").unwrap();
        let writes = backend.write_count();
        let before = backend.text();

        assert_eq!(store.delete_task("nonexistent").unwrap(), 0);

        assert_eq!(backend.write_count(), writes);
        assert_eq!(backend.text(), before);
    }

    #[test]
    fn test_delete_by_id() {
        let (store, _) = make_store();
        store.add_task("same").unwrap();
        let second = store.add_task("same").unwrap();

        let removed = store.delete_task_by_id(&second.id).unwrap();
        assert_eq!(removed, Some(second));
        assert_eq!(store.list_tasks().len(), 1);

        assert_eq!(store.delete_task_by_id("missing").unwrap(), None);
    }

    // --- Recovery Tests ---

    #[test]
    fn test_list_degrades_on_corrupt_file() {
        let backend = MemBackend::with_text("not a valid header\n");
        let store = TaskStore::with_backend(backend.clone());

        assert!(store.list_tasks().is_empty());
        assert!(matches!(
            store.try_list_tasks(),
            Err(ToondoError::Corrupt { .. })
        ));
        // Reading never touches the unreadable file.
        assert_eq!(backend.text().as_deref(), Some("not a valid header\n"));
    }

    #[test]
    fn test_foreign_collection_is_corrupt() {
        let backend = MemBackend::with_text("notes[1]{text}:\nhello\n");
        let store = TaskStore::with_backend(backend);
        assert!(matches!(
            store.try_list_tasks(),
            Err(ToondoError::Corrupt {
                source: FormatError::UnexpectedCollection { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_mutation_quarantines_corrupt_file() {
        let backend = MemBackend::with_text("garbage\n");
        let store = TaskStore::with_backend(backend.clone());

        store.add_task("fresh start").unwrap();

        assert_eq!(backend.quarantined(), vec![b"garbage\n".to_vec()]);
        assert_eq!(descriptions(&store), vec!["fresh start"]);
    }

    #[test]
    fn test_noop_delete_leaves_corrupt_file_alone() {
        let backend = MemBackend::with_text("garbage\n");
        let store = TaskStore::with_backend(backend.clone());

        assert_eq!(store.delete_task("anything").unwrap(), 0);
        assert!(backend.quarantined().is_empty());
        assert_eq!(backend.text().as_deref(), Some("garbage\n"));
    }

    #[test]
    fn test_reads_hand_written_file() {
        let backend = MemBackend::with_text(
            "tasks[9]{id,description,status,created_at}:\n  \
             a1,\"eggs, milk\",done,2025-01-01 10:00:00\n  \
             b2,short row\n",
        );
        let store = TaskStore::with_backend(backend);
        let tasks = store.try_list_tasks().unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "eggs, milk");
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[1].status, TaskStatus::Other(String::new()));
        assert_eq!(tasks[1].created_at, "");
    }

    #[test]
    fn test_mutation_keeps_extra_columns_and_raw_status() {
        let original = "tasks[1]{id,description,status,created_at,priority}:\n\
                        a1,old,\" \",2025-01-01 00:00:00,high\n";
        let backend = MemBackend::with_text(original);
        let store = TaskStore::with_backend(backend.clone());

        let added = store.add_task("new").unwrap();

        let text = backend.text().unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("tasks[2]{id,description,status,created_at,priority}:")
        );
        assert_eq!(lines.next(), Some("a1,old,\" \",2025-01-01 00:00:00,high"));
        assert_eq!(
            lines.next(),
            Some(format!("{},new,pending,{},", added.id, added.created_at).as_str())
        );

        let tasks = store.try_list_tasks().unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Other(" ".to_string()));
        assert_eq!(tasks[0].field("priority"), "high");
    }

    #[test]
    fn test_bare_blank_status_keeps_its_value() {
        let backend = MemBackend::with_text(
            "tasks[1]{id,description,status,created_at,priority}:\n\
             a1,old, ,2025-01-01 00:00:00,high\n",
        );
        let store = TaskStore::with_backend(backend.clone());

        store.add_task("new").unwrap();

        let text = backend.text().unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("a1,old,\" \",2025-01-01 00:00:00,high")
        );
        let tasks = store.try_list_tasks().unwrap();
        assert_eq!(tasks[0].status.as_str(), " ");
        assert_eq!(tasks[0].field("priority"), "high");
    }

    #[test]
    fn test_mutation_fills_in_missing_task_fields() {
        let backend = MemBackend::with_text("tasks[1]{description}:\nonly\n");
        let store = TaskStore::with_backend(backend.clone());

        store.delete_task_by_id("nothing").unwrap();
        store.add_task("more").unwrap();

        let text = backend.text().unwrap();
        assert!(text.starts_with("tasks[2]{description,id,status,created_at}:\nonly,,,\n"));
        assert_eq!(descriptions(&store), vec!["only", "more"]);
    }

    #[test]
    fn test_invalid_utf8_is_unreadable_and_quarantined() {
        let raw = b"tasks[1]{id,description,status,created_at}:\na1,caf\xe9,pending,x\n";
        let backend = MemBackend::with_bytes(raw.to_vec());
        let store = TaskStore::with_backend(backend.clone());

        assert!(store.list_tasks().is_empty());
        assert!(matches!(
            store.try_list_tasks(),
            Err(ToondoError::Corrupt {
                source: FormatError::InvalidEncoding { offset: 50 },
                ..
            })
        ));
        assert_eq!(backend.bytes().as_deref(), Some(&raw[..]));

        store.add_task("fresh").unwrap();

        assert_eq!(backend.quarantined(), vec![raw.to_vec()]);
        assert_eq!(descriptions(&store), vec!["fresh"]);
    }

    // --- Error Handling Tests ---

    #[test]
    fn test_add_fails_on_write_error() {
        let (store, backend) = make_store();
        store.ensure_initialized().unwrap();
        backend.set_simulate_write_error(true);

        let result = store.add_task("lost");
        assert!(matches!(result, Err(ToondoError::NotPersisted(_))));

        backend.set_simulate_write_error(false);
        assert!(store.list_tasks().is_empty());
    }

    #[test]
    fn test_delete_fails_on_write_error() {
        let (store, backend) = make_store();
        store.add_task("stay").unwrap();
        backend.set_simulate_write_error(true);

        assert!(matches!(
            store.delete_task("stay"),
            Err(ToondoError::NotPersisted(_))
        ));
        backend.set_simulate_write_error(false);
        assert_eq!(descriptions(&store), vec!["stay"]);
    }

    #[test]
    fn test_list_swallows_init_failure() {
        let (store, backend) = make_store();
        backend.set_simulate_write_error(true);
        assert!(store.list_tasks().is_empty());
        assert!(store.ensure_initialized().is_err());
    }

    // --- Doctor Tests ---

    #[test]
    fn test_doctor_clean_file() {
        let (store, _) = make_store();
        store.add_task("ok").unwrap();
        let report = store.doctor().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.task_count, 1);
    }

    #[test]
    fn test_doctor_creates_missing_file() {
        let (store, backend) = make_store();
        let report = store.doctor().unwrap();
        assert!(report.created_file);
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
    }

    #[test]
    fn test_doctor_fixes_header_count() {
        let backend = MemBackend::with_text(
            "tasks[5]{id,description,status,created_at}:\na1,one,pending,x\n",
        );
        let store = TaskStore::with_backend(backend.clone());

        let report = store.doctor().unwrap();

        assert!(report.fixed_header_count);
        assert!(report.normalized);
        assert_eq!(
            backend.text().as_deref(),
            Some("tasks[1]{id,description,status,created_at}:\na1,one,pending,x\n")
        );
    }

    #[test]
    fn test_doctor_quarantines_corrupt_file() {
        let backend = MemBackend::with_text("not a valid header\n");
        let store = TaskStore::with_backend(backend.clone());

        let report = store.doctor().unwrap();

        assert!(report.quarantined_to.is_some());
        assert_eq!(backend.quarantined().len(), 1);
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
        assert!(store.try_list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_doctor_quarantines_invalid_utf8() {
        let raw = b"tasks[1]{id,description,status,created_at}:\na1,caf\xe9,pending,x\n";
        let backend = MemBackend::with_bytes(raw.to_vec());
        let store = TaskStore::with_backend(backend.clone());

        let report = store.doctor().unwrap();

        assert!(!report.created_file);
        assert!(report.quarantined_to.is_some());
        assert_eq!(backend.quarantined(), vec![raw.to_vec()]);
        assert_eq!(backend.text().as_deref(), Some(EMPTY));
    }

    #[test]
    fn test_doctor_keeps_extra_columns() {
        let text = "tasks[1]{id,description,status,created_at,priority}:\na1,x,done,t,high\n";
        let backend = MemBackend::with_text(text);
        let store = TaskStore::with_backend(backend.clone());

        let report = store.doctor().unwrap();

        assert!(report.is_clean());
        assert_eq!(backend.text().as_deref(), Some(text));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_location() {
        let (store, _) = make_store();
        assert_eq!(store.location(), PathBuf::from("memory://tasks.toon"));
    }
}
