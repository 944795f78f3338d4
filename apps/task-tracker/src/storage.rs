//! Flat-file persistence for the task list.
//!
//! One task per line in the format written by [`Task::to_persisted_line`],
//! newline-separated with no trailing newline.

use crate::error::{TaskError, TaskResult};
use crate::models::Task;
use crate::tasks::TaskList;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Tasks read back from disk, plus any lines that could not be parsed.
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: TaskList,
    /// `TaskError::CorruptRecord` for each skipped line.
    pub corrupt: Vec<TaskError>,
    /// True when the file did not exist and was created empty.
    pub created: bool,
}

/// Location of the task file.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
    path: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(file_name);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the storage directory if it is missing.
    ///
    /// Failure is not fatal to the caller; later reads and writes may still fail.
    pub fn ensure_storage_directory(&self) -> TaskResult<()> {
        if self.dir.is_dir() {
            return Ok(());
        }
        tracing::info!(dir = %self.dir.display(), "creating storage directory");
        fs::create_dir_all(&self.dir).map_err(|source| TaskError::StorageDirectoryUnavailable {
            path: self.dir.clone(),
            source,
        })
    }

    /// Read every task from the file, creating an empty file if none exists.
    pub fn load(&self) -> TaskResult<Loaded> {
        let read_err = |source| TaskError::ReadFailure {
            path: self.path.clone(),
            source,
        };
        let created = !self.path.exists();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(read_err)?;

        let mut tasks = Vec::new();
        let mut corrupt = Vec::new();
        for (i, bytes) in BufReader::new(file).split(b'\n').enumerate() {
            let bytes = bytes.map_err(read_err)?;
            let parsed = String::from_utf8(bytes)
                .map_err(|e| format!("not valid UTF-8 ({})", e.utf8_error()))
                .and_then(|line| {
                    if line.trim().is_empty() {
                        Ok(None)
                    } else {
                        Task::from_persisted_line(&line).map(Some)
                    }
                });
            match parsed {
                Ok(None) => {}
                Ok(Some(task)) => tasks.push(task),
                Err(reason) => {
                    let err = TaskError::CorruptRecord { line: i + 1, reason };
                    tracing::warn!(path = %self.path.display(), "{}", err);
                    corrupt.push(err);
                }
            }
        }

        tracing::info!(
            path = %self.path.display(),
            tasks = tasks.len(),
            skipped = corrupt.len(),
            created,
            "loaded task file"
        );
        Ok(Loaded {
            tasks: TaskList::from(tasks),
            corrupt,
            created,
        })
    }

    /// Append one task as a new last line.
    pub fn append(&self, task: &Task) -> TaskResult<()> {
        let write_err = |source| TaskError::WriteFailure {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(write_err)?;
        let non_empty = file.metadata().map_err(write_err)?.len() > 0;
        if non_empty {
            file.write_all(b"\n").map_err(write_err)?;
        }
        file.write_all(task.to_persisted_line().as_bytes())
            .map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), "appended task");
        Ok(())
    }

    /// Replace the whole file with the current list.
    pub fn rewrite(&self, tasks: &TaskList) -> TaskResult<()> {
        let content = tasks
            .iter()
            .map(Task::to_persisted_line)
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&self.path, content).map_err(|source| TaskError::WriteFailure {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "rewrote task file");
        Ok(())
    }
}
