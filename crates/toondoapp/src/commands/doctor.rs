use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::task_store::TaskStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &TaskStore<B>) -> Result<CmdResult> {
    let report = store.doctor()?;
    let mut result = CmdResult::default();

    if report.is_clean() {
        result.add_message(CmdMessage::success(format!(
            "No inconsistencies found ({} task(s)).",
            report.task_count
        )));
        return Ok(result);
    }

    result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
    if report.created_file {
        result.add_message(CmdMessage::info(format!(
            "  - Created missing task list at {}.",
            store.location().display()
        )));
    }
    if let Some(path) = &report.quarantined_to {
        result.add_message(CmdMessage::warning(format!(
            "  - Unreadable task list moved to {} and reset.",
            path.display()
        )));
    }
    if report.fixed_header_count {
        result.add_message(CmdMessage::info(format!(
            "  - Fixed header row count ({} task(s)).",
            report.task_count
        )));
    } else if report.normalized {
        result.add_message(CmdMessage::info("  - Rewrote task list in canonical form."));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn doctor_no_inconsistencies() {
        let store = TaskStore::with_backend(MemBackend::new());
        store.add_task("fine").unwrap();

        let result = run(&store).unwrap();

        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("No inconsistencies"));
    }

    #[test]
    fn doctor_reports_quarantine() {
        let backend = MemBackend::with_text("garbage\n");
        let store = TaskStore::with_backend(backend.clone());

        let result = run(&store).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("Unreadable task list moved to")));
        assert_eq!(backend.quarantined(), vec![b"garbage\n".to_vec()]);
    }

    #[test]
    fn doctor_reports_header_fix() {
        let backend = MemBackend::with_text(
            "tasks[3]{id,description,status,created_at}:\na1,one,pending,x\n",
        );
        let store = TaskStore::with_backend(backend);

        let result = run(&store).unwrap();

        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("Fixed header row count (1 task(s))")));
    }

    #[test]
    fn doctor_reports_created_file() {
        let store = TaskStore::with_backend(MemBackend::new());
        let result = run(&store).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("Created missing task list")));
    }
}
