//! Parsing of raw input lines into commands.

use crate::error::{TaskError, TaskResult};
use crate::tasks::{BY_MARKER, FROM_MARKER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Todo(String),
    Deadline { description: String, spec: String },
    Event { description: String, spec: String },
    List,
    Mark(usize),
    Unmark(usize),
    Delete(usize),
    Find(String),
    Remind,
    Help,
    Bye,
}

impl Command {
    /// True for commands that change the task list.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Todo(_)
                | Command::Deadline { .. }
                | Command::Event { .. }
                | Command::Mark(_)
                | Command::Unmark(_)
                | Command::Delete(_)
        )
    }
}

pub fn parse(line: &str) -> TaskResult<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "todo" => Ok(Command::Todo(rest.to_string())),
        "deadline" => {
            let (description, spec) = split_at_marker(rest, BY_MARKER);
            Ok(Command::Deadline { description, spec })
        }
        "event" => {
            let (description, spec) = split_at_marker(rest, FROM_MARKER);
            Ok(Command::Event { description, spec })
        }
        "list" => Ok(Command::List),
        "mark" => task_number(rest).map(Command::Mark),
        "unmark" => task_number(rest).map(Command::Unmark),
        "delete" => task_number(rest).map(Command::Delete),
        "find" => Ok(Command::Find(rest.to_string())),
        "remind" => Ok(Command::Remind),
        "help" => Ok(Command::Help),
        "bye" => Ok(Command::Bye),
        _ => Err(TaskError::UnknownCommand(word.to_string())),
    }
}

/// Description is everything before the first `marker` followed by a space;
/// the date part is the rest.
fn split_at_marker(rest: &str, marker: &str) -> (String, String) {
    match rest.find(&format!("{} ", marker)) {
        Some(at) => (rest[..at].trim().to_string(), rest[at..].to_string()),
        None => (rest.to_string(), String::new()),
    }
}

fn task_number(arg: &str) -> TaskResult<usize> {
    arg.parse()
        .map_err(|_| TaskError::InvalidTaskNumber(arg.to_string()))
}
