use crate::codec::{Document, FormatError, Record};
use chrono::{DateTime, Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Name of the single collection in the task file.
pub const TASK_COLLECTION: &str = "tasks";

/// Task fields, in the order they are written.
pub const TASK_FIELDS: [&str; 4] = ["id", "description", "status", "created_at"];

/// Length of generated task ids.
pub const ID_LEN: usize = 8;

/// Layout of `created_at` (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    /// Any other value found on disk, blank or padded ones included, kept
    /// exactly as written.
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => TaskStatus::Pending,
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: String,
    /// Columns the file declares beyond [`TASK_FIELDS`], carried through
    /// rewrites untouched.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
}

impl Task {
    /// A fresh pending task stamped with the current local time.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            description: description.into(),
            status: TaskStatus::Pending,
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            extra: IndexMap::new(),
        }
    }

    /// Deletion compares descriptions with surrounding whitespace trimmed on both sides.
    pub fn matches_description(&self, description: &str) -> bool {
        self.description.trim() == description.trim()
    }

    /// `created_at` as a timestamp, if it is in the expected layout.
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT)
            .ok()?
            .and_local_timezone(Local)
            .earliest()
    }

    /// Missing fields read as empty strings.
    pub fn from_record(record: &Record) -> Self {
        let field = |name: &str| record.get(name).unwrap_or_default().to_string();
        Self {
            id: field("id"),
            description: field("description"),
            status: TaskStatus::from(field("status")),
            created_at: field("created_at"),
            extra: record
                .iter()
                .filter(|(name, _)| !TASK_FIELDS.contains(name))
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// The value written under `field`.
    pub fn field(&self, field: &str) -> &str {
        match field {
            "id" => &self.id,
            "description" => &self.description,
            "status" => self.status.as_str(),
            "created_at" => &self.created_at,
            other => self.extra.get(other).map(String::as_str).unwrap_or_default(),
        }
    }
}

/// Short opaque id: the first [`ID_LEN`] hex digits of a v4 UUID.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string().chars().take(ID_LEN).collect()
}

/// The document written for a fresh task list.
pub fn tasks_document(tasks: &[Task]) -> Result<Document, FormatError> {
    tasks_document_with_fields(tasks, &[])
}

/// The document written for a task list read from a file declaring
/// `declared`. Declared fields keep their order; task fields and extra
/// columns the file lacks are appended.
pub fn tasks_document_with_fields(
    tasks: &[Task],
    declared: &[String],
) -> Result<Document, FormatError> {
    let mut fields: Vec<String> = declared.to_vec();
    let wanted = TASK_FIELDS
        .iter()
        .map(|f| f.to_string())
        .chain(tasks.iter().flat_map(|t| t.extra.keys().cloned()));
    for name in wanted {
        if !fields.contains(&name) {
            fields.push(name);
        }
    }

    let mut doc = Document::new(TASK_COLLECTION, fields.iter().cloned())?;
    for task in tasks {
        doc.push_row(fields.iter().map(|f| task.field(f)));
    }
    Ok(doc)
}
