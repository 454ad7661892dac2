use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;

/// Delete every task whose description matches.
pub fn run<B: StorageBackend>(store: &TaskStore<B>, description: &str) -> Result<CmdResult> {
    let removed = store.delete_task(description)?;

    let mut result = CmdResult::default();
    match removed {
        0 => result.add_message(CmdMessage::warning(format!(
            "No task matches: {}",
            description.trim()
        ))),
        1 => result.add_message(CmdMessage::success(format!(
            "Task deleted: {}",
            description.trim()
        ))),
        n => result.add_message(CmdMessage::success(format!(
            "{} tasks deleted: {}",
            n,
            description.trim()
        ))),
    }
    Ok(result)
}

/// Delete the task with this id.
pub fn run_by_id<B: StorageBackend>(store: &TaskStore<B>, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.delete_task_by_id(id.trim())? {
        Some(task) => {
            result.add_message(CmdMessage::success(format!(
                "Task deleted ({}): {}",
                task.id, task.description
            )));
            result.affected_tasks.push(task);
        }
        None => result.add_message(CmdMessage::warning(format!(
            "No task with id {}",
            id.trim()
        ))),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn deletes_all_matching() {
        let store = TaskStore::with_backend(MemBackend::new());
        store.add_task("buy milk").unwrap();
        store.add_task("buy milk").unwrap();
        store.add_task("walk dog").unwrap();

        let result = run(&store, "buy milk").unwrap();

        assert_eq!(result.messages[0].content, "2 tasks deleted: buy milk");
        assert_eq!(store.list_tasks().len(), 1);
    }

    #[test]
    fn no_match_is_a_warning() {
        let store = TaskStore::with_backend(MemBackend::new());
        store.add_task("walk dog").unwrap();

        let result = run(&store, "nonexistent").unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(store.list_tasks().len(), 1);
    }

    #[test]
    fn deletes_by_id() {
        let store = TaskStore::with_backend(MemBackend::new());
        let task = store.add_task("walk dog").unwrap();

        let result = run_by_id(&store, &task.id).unwrap();

        assert_eq!(result.affected_tasks, vec![task]);
        assert!(store.list_tasks().is_empty());
    }

    #[test]
    fn unknown_id_is_a_warning() {
        let store = TaskStore::with_backend(MemBackend::new());
        let result = run_by_id(&store, "deadbeef").unwrap();
        assert!(result.affected_tasks.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }
}
