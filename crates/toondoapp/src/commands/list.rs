use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;

/// List tasks in file order.
///
/// An unreadable task list shows as empty with a warning pointing at `doctor`.
pub fn run<B: StorageBackend>(store: &TaskStore<B>) -> Result<CmdResult> {
    match store.try_list_tasks() {
        Ok(tasks) => Ok(CmdResult::default().with_listed_tasks(tasks)),
        Err(e) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(e.to_string()));
            result.add_message(CmdMessage::info(
                "Run `toondo doctor` to repair the task list.",
            ));
            Ok(result)
        }
    }
}
