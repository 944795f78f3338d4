//! Error types for the task tracker.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by task list, parser, command and storage operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Description was empty after trimming.
    #[error("The description of a task cannot be empty.")]
    EmptyDescription,

    /// A deadline or event lacked its date marker or the text after it.
    #[error("You forgot to give a \"{marker} <date time>\" for this task.")]
    MissingDateMarker { marker: &'static str },

    /// An event had a start but no `/to` part.
    #[error("You forgot to give a \"/to <date time>\" for the event.")]
    MissingToMarker,

    /// No permitted date/time format matched.
    #[error(
        "Could not read \"{input}\" as a date and time.\n\
         Permitted formats for date: {}\n\
         Permitted formats for time (24-hour only): {}\n\
         E.g. 22/09/2023 2200 | 2023-08-30 01:00",
        .dates.join(" | "),
        .times.join(" | ")
    )]
    BadDateTimeFormat {
        input: String,
        dates: Vec<&'static str>,
        times: Vec<&'static str>,
    },

    /// 1-based task number outside the list.
    #[error("Task {index} does not exist. You have {len} task(s) in the list.")]
    TaskNotFound { index: usize, len: usize },

    /// Task number argument was missing or not a number.
    #[error("\"{0}\" is not a valid task number.")]
    InvalidTaskNumber(String),

    /// Command word not recognised.
    #[error("Sorry, I don't know what \"{0}\" means. Type \"help\" to see the commands.")]
    UnknownCommand(String),

    /// Writing the task file failed.
    #[error("Something went wrong while writing to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening or reading the task file failed.
    #[error("Could not read or create {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage directory could not be created.
    #[error("Storage directory {} is unavailable: {source}", .path.display())]
    StorageDirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted line could not be turned back into a task.
    #[error("Skipped corrupt record on line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },
}

/// Result type for task tracker operations.
pub type TaskResult<T> = Result<T, TaskError>;
