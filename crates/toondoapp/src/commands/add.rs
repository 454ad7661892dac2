use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ToondoError};
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &TaskStore<B>, description: &str) -> Result<CmdResult> {
    if description.trim().is_empty() {
        return Err(ToondoError::Api(
            "Task description cannot be empty".to_string(),
        ));
    }

    let task = store.add_task(description)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Task added: {}",
        task.description
    )));
    result.affected_tasks.push(task);
    Ok(result)
}
