use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use timeago::Formatter;
use toondoapp::commands::{CmdMessage, MessageLevel};
use toondoapp::error::{Result, ToondoError};
use toondoapp::model::{Task, TaskStatus};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 12;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    for line in task_lines(tasks) {
        println!("{}", line);
    }
}

/// One display line per task: index, description, status, age.
fn task_lines(tasks: &[Task]) -> Vec<String> {
    let idx_width = format!("{}. ", tasks.len()).width();

    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let idx_str = format!("{:>width$}", format!("{}. ", i + 1), width = idx_width);
            let fixed_width = 2 + idx_width + STATUS_WIDTH + TIME_WIDTH;
            let available = LINE_WIDTH.saturating_sub(fixed_width);

            let description = truncate_to_width(&single_line(&task.description), available);
            let padding = available.saturating_sub(description.width());

            let status = format!("{:<width$}", task.status.as_str(), width = STATUS_WIDTH);
            let status_colored = match task.status {
                TaskStatus::Done => status.green(),
                TaskStatus::InProgress => status.cyan(),
                TaskStatus::Pending => status.normal(),
                TaskStatus::Other(_) => status.magenta(),
            };

            format!(
                "  {}{}{}{}{}",
                idx_str.yellow(),
                description,
                " ".repeat(padding),
                status_colored,
                format_time_ago(task).dimmed()
            )
        })
        .collect()
}

#[derive(Serialize)]
struct JsonTask<'a> {
    index: usize,
    #[serde(flatten)]
    task: &'a Task,
}

pub(super) fn tasks_json(tasks: &[Task]) -> Result<String> {
    let rows: Vec<_> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| JsonTask { index: i + 1, task })
        .collect();
    serde_json::to_string_pretty(&rows).map_err(|e| ToondoError::Api(e.to_string()))
}

fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(task: &Task) -> String {
    let time_str = match task.created_at_local() {
        Some(created) => {
            let duration = Local::now().signed_duration_since(created);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        None => task.created_at.clone(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
