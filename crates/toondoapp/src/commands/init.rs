use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &TaskStore<B>) -> Result<CmdResult> {
    let created = store.ensure_initialized()?;
    let location = store.location();

    let mut result = CmdResult::default();
    if created {
        result.add_message(CmdMessage::success(format!(
            "Initialized task list at {}",
            location.display()
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Task list already exists at {}",
            location.display()
        )));
    }
    Ok(result)
}
