//! The in-memory task list and its operations.

use crate::datetime::parse_user_input;
use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskStats};
use chrono::{Duration, NaiveDateTime};

pub const BY_MARKER: &str = "/by";
pub const FROM_MARKER: &str = "/from";
pub const TO_MARKER: &str = "/to";

/// Result of a mark or unmark request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOutcome {
    /// False when the task was already in the requested state.
    pub changed: bool,
    pub rendered: String,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub rendered: String,
    pub remaining: usize,
}

/// Ordered task list. Positions are 1-based at this API.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Task at a 1-based position.
    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Task> {
        index.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    pub fn add_todo(&mut self, description: &str) -> TaskResult<&Task> {
        let description = non_empty(description)?;
        Ok(self.push(Task::todo(description)))
    }

    /// Add a deadline; `raw_spec` must contain `/by <date time>`.
    pub fn add_deadline(&mut self, description: &str, raw_spec: &str) -> TaskResult<&Task> {
        let description = non_empty(description)?;
        let due = text_after(raw_spec, BY_MARKER)
            .ok_or(TaskError::MissingDateMarker { marker: BY_MARKER })?;
        let due = parse_user_input(due)?;
        Ok(self.push(Task::deadline(description, due)))
    }

    /// Add an event; `raw_spec` must contain `/from <date time>` followed by
    /// `/to <date time>`.
    pub fn add_event(&mut self, description: &str, raw_spec: &str) -> TaskResult<&Task> {
        let description = non_empty(description)?;
        let from = text_after(raw_spec, FROM_MARKER)
            .ok_or(TaskError::MissingDateMarker { marker: FROM_MARKER })?;
        let (start, end) = match find_marker(from, TO_MARKER) {
            Some((start, end)) => (start, end.trim()),
            None => return Err(TaskError::MissingToMarker),
        };
        if start.trim().is_empty() {
            return Err(TaskError::MissingDateMarker { marker: FROM_MARKER });
        }
        if end.is_empty() {
            return Err(TaskError::MissingToMarker);
        }
        let start = parse_user_input(start)?;
        let end = parse_user_input(end)?;
        if start > end {
            tracing::warn!(%start, %end, "event ends before it starts");
        }
        Ok(self.push(Task::event(description, start, end)))
    }

    /// Mark (`done == true`) or unmark the task at a 1-based position.
    pub fn mark_or_unmark(&mut self, index: usize, done: bool) -> TaskResult<MarkOutcome> {
        let len = self.tasks.len();
        let task = index
            .checked_sub(1)
            .and_then(|i| self.tasks.get_mut(i))
            .ok_or(TaskError::TaskNotFound { index, len })?;
        let changed = task.is_done() != done;
        if done {
            task.mark_done();
        } else {
            task.mark_not_done();
        }
        tracing::info!(index, done, changed, "marked task");
        Ok(MarkOutcome {
            changed,
            rendered: task.to_string(),
        })
    }

    /// Remove the task at a 1-based position.
    pub fn delete(&mut self, index: usize) -> TaskResult<Deleted> {
        let len = self.tasks.len();
        if index == 0 || index > len {
            return Err(TaskError::TaskNotFound { index, len });
        }
        let removed = self.tasks.remove(index - 1);
        tracing::info!(index, "deleted task");
        Ok(Deleted {
            rendered: removed.to_string(),
            remaining: self.tasks.len(),
        })
    }

    /// Tasks whose rendered form contains `keyword`, ignoring case.
    pub fn find(&self, keyword: &str) -> Vec<&Task> {
        let keyword = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.to_string().to_lowercase().contains(&keyword))
            .collect()
    }

    /// Deadlines and events that are due within `window` of `now`, or overdue.
    pub fn reminder(&self, now: NaiveDateTime, window: Duration) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_within_due(now, window))
            .collect()
    }

    pub fn stats(&self, now: NaiveDateTime, window: Duration) -> TaskStats {
        TaskStats {
            total: self.tasks.len(),
            done: self.tasks.iter().filter(|t| t.is_done()).count(),
            due_soon: self.reminder(now, window).len(),
        }
    }

    fn push(&mut self, task: Task) -> &Task {
        tracing::info!(task = %task, "added task");
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }
}

fn non_empty(description: &str) -> TaskResult<&str> {
    let description = description.trim();
    if description.is_empty() {
        Err(TaskError::EmptyDescription)
    } else {
        Ok(description)
    }
}

/// Split `text` at the first `marker` followed by a space; returns the text
/// before the marker and the text after `marker `.
fn find_marker<'a>(text: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let needle = format!("{} ", marker);
    text.find(&needle)
        .map(|at| (&text[..at], &text[at + needle.len()..]))
}

/// Non-empty text following `marker ` in `spec`.
fn text_after<'a>(spec: &'a str, marker: &str) -> Option<&'a str> {
    find_marker(spec, marker)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}
