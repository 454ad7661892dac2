//! # Command Layer
//!
//! Each command lives in its own submodule and exposes a `run` function over a
//! [`TaskStore`](crate::store::task_store::TaskStore). Commands validate input,
//! call the store and describe what happened as a [`CmdResult`].
//!
//! Commands never print. The UI layer decides how to render the result.
//!
//! ## Command Modules
//!
//! - [`init`]: Create the task file
//! - [`add`]: Append a task
//! - [`list`]: List tasks
//! - [`delete`]: Remove tasks by description or id
//! - [`doctor`]: Verify and repair the task file

use crate::model::Task;
use serde::Serialize;

pub mod add;
pub mod delete;
pub mod doctor;
pub mod init;
pub mod list;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Tasks created or removed by the command.
    pub affected_tasks: Vec<Task>,
    /// Tasks to display.
    pub listed_tasks: Vec<Task>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.listed_tasks = tasks;
        self
    }
}
