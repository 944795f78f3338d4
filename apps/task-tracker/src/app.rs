//! Application state and command dispatch.

use crate::command::{self, Command};
use crate::config::Config;
use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskStats};
use crate::storage::Storage;
use crate::tasks::TaskList;
use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Who a conversation entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Tracker,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

pub struct App {
    pub config: Config,
    pub storage: Storage,
    pub tasks: TaskList,
    pub log: Vec<Entry>,
    pub input: String,
    /// Lines scrolled back from the bottom of the log.
    pub scroll_back: u16,
    pub stats: TaskStats,
    pub should_quit: bool,
}

const HELP: &str = "\
Here is what I understand:
  todo <description>
  deadline <description> /by <date time>
  event <description> /from <date time> /to <date time>
  list
  mark <n> | unmark <n> | delete <n>
  find <keyword>
  remind
  bye
Dates: dd-MM-yyyy | yyyy-MM-dd | dd/MM/yyyy | yyyy/MM/dd
Times: HHmm | HH:mm (24-hour)";

impl App {
    /// Build the app and load saved tasks. Storage problems are reported in
    /// the conversation log; the list then starts empty.
    pub fn new(config: Config) -> Self {
        let storage = Storage::new(config.storage.dir.clone(), &config.storage.file);
        let mut app = Self {
            config,
            storage,
            tasks: TaskList::new(),
            log: Vec::new(),
            input: String::new(),
            scroll_back: 0,
            stats: TaskStats::default(),
            should_quit: false,
        };
        app.start();
        app
    }

    fn start(&mut self) {
        if let Err(e) = self.storage.ensure_storage_directory() {
            tracing::warn!(error = %e, "storage directory unavailable");
            self.warn(&e);
        }

        match self.storage.load() {
            Ok(loaded) => {
                let path = self.storage.path().display().to_string();
                if loaded.created {
                    self.say(format!("No saved tasks found, starting a new list at {}.", path));
                } else {
                    self.say(format!("Loaded {} task(s) from {}.", loaded.tasks.len(), path));
                }
                for err in &loaded.corrupt {
                    self.warn(err);
                }
                self.tasks = loaded.tasks;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load tasks");
                self.warn(&e);
            }
        }

        self.say("Hello! I'm your task tracker.\nWhat can I do for you? (type \"help\" for commands)".to_string());

        if self.config.reminder.show_on_startup {
            let due = self.tasks.reminder(now(), self.config.reminder_window());
            if !due.is_empty() {
                let text = reminder_message(&due);
                self.say(text);
            }
        }
        self.update_stats();
    }

    /// Run one line of user input.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.log.push(Entry {
            speaker: Speaker::User,
            text: line.to_string(),
        });
        self.scroll_back = 0;

        let result = command::parse(line).and_then(|cmd| {
            let mutating = cmd.is_mutating();
            let reply = self.execute(cmd);
            if mutating {
                self.update_stats();
            }
            reply
        });
        match result {
            Ok(reply) => self.say(reply),
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                self.warn(&e);
            }
        }
    }

    fn execute(&mut self, cmd: Command) -> TaskResult<String> {
        match cmd {
            Command::Todo(description) => {
                let task = self.tasks.add_todo(&description)?.clone();
                self.added(&task)
            }
            Command::Deadline { description, spec } => {
                let task = self.tasks.add_deadline(&description, &spec)?.clone();
                self.added(&task)
            }
            Command::Event { description, spec } => {
                let task = self.tasks.add_event(&description, &spec)?.clone();
                self.added(&task)
            }
            Command::List => Ok(if self.tasks.is_empty() {
                "Your list is empty.".to_string()
            } else {
                format!(
                    "Here are the tasks in your list:\n{}",
                    numbered(self.tasks.iter())
                )
            }),
            Command::Mark(index) => {
                let outcome = self.tasks.mark_or_unmark(index, true)?;
                self.storage.rewrite(&self.tasks)?;
                let head = if outcome.changed {
                    "Nice! I've marked this task as done:"
                } else {
                    "This task is already marked as done:"
                };
                Ok(format!("{}\n  {}", head, outcome.rendered))
            }
            Command::Unmark(index) => {
                let outcome = self.tasks.mark_or_unmark(index, false)?;
                self.storage.rewrite(&self.tasks)?;
                let head = if outcome.changed {
                    "OK, I've marked this task as not done yet:"
                } else {
                    "This task is already marked as not done:"
                };
                Ok(format!("{}\n  {}", head, outcome.rendered))
            }
            Command::Delete(index) => {
                let deleted = self.tasks.delete(index)?;
                self.storage.rewrite(&self.tasks)?;
                Ok(format!(
                    "Noted. I've removed this task:\n  {}\nNow you have {} task(s) in the list.",
                    deleted.rendered, deleted.remaining
                ))
            }
            Command::Find(keyword) => {
                let found = self.tasks.find(&keyword);
                Ok(if found.is_empty() {
                    "No matching tasks found.".to_string()
                } else {
                    format!(
                        "Here are the matching tasks in your list:\n{}",
                        numbered(found.into_iter())
                    )
                })
            }
            Command::Remind => {
                let due = self.tasks.reminder(now(), self.config.reminder_window());
                Ok(if due.is_empty() {
                    "Nothing due soon.".to_string()
                } else {
                    reminder_message(&due)
                })
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Bye => {
                self.should_quit = true;
                Ok("Bye. Hope to see you again soon!".to_string())
            }
        }
    }

    fn added(&self, task: &Task) -> TaskResult<String> {
        self.storage.append(task)?;
        Ok(format!(
            "Got it. I've added this task:\n  {}\nNow you have {} task(s) in the list.",
            task,
            self.tasks.len()
        ))
    }

    fn say(&mut self, text: String) {
        self.log.push(Entry {
            speaker: Speaker::Tracker,
            text,
        });
    }

    fn warn(&mut self, err: &TaskError) {
        self.log.push(Entry {
            speaker: Speaker::Warning,
            text: err.to_string(),
        });
    }

    pub fn update_stats(&mut self) {
        self.stats = self.tasks.stats(now(), self.config.reminder_window());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.submit(&line);
            }
            KeyCode::Up => self.scroll_back = self.scroll_back.saturating_add(1),
            KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
            KeyCode::PageUp => self.scroll_back = self.scroll_back.saturating_add(10),
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            _ => {}
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn numbered<'a>(tasks: impl Iterator<Item = &'a Task>) -> String {
    tasks
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n")
}

fn reminder_message(due: &[&Task]) -> String {
    format!(
        "Heads up! These tasks are due soon or overdue:\n{}",
        numbered(due.iter().copied())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app_in(tmp: &TempDir) -> App {
        let mut config = Config::default();
        config.storage.dir = tmp.path().join("data");
        App::new(config)
    }

    fn last(app: &App) -> &Entry {
        app.log.last().unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_startup_creates_file() {
        let tmp = TempDir::new().unwrap();
        let app = app_in(&tmp);
        assert!(tmp.path().join("data").join("tasks.txt").is_file());
        assert!(app.log[0].text.starts_with("No saved tasks found"));
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_add_flushes_to_disk() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        app.submit("deadline submit report /by 2023-08-30 0100");
        assert_eq!(last(&app).speaker, Speaker::Tracker);
        assert!(last(&app).text.contains("Now you have 1 task(s) in the list."));
        app.submit("todo read book");

        let content = fs::read_to_string(app.storage.path()).unwrap();
        assert_eq!(
            content,
            "D |   | submit report | Aug 30 2023 01:00AM\nT |   | read book"
        );
        assert_eq!(app.stats.total, 2);
    }

    #[test]
    fn test_mark_messages() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        app.submit("todo read book");
        app.submit("mark 1");
        assert!(last(&app).text.starts_with("Nice! I've marked this task as done:"));
        app.submit("mark 1");
        assert!(last(&app).text.starts_with("This task is already marked as done:"));
        assert_eq!(
            fs::read_to_string(app.storage.path()).unwrap(),
            "T | X | read book"
        );
        app.submit("unmark 1");
        assert!(last(&app).text.contains("[T][ ] read book"));
    }

    #[test]
    fn test_errors_become_warnings() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        app.submit("delete 1");
        assert_eq!(last(&app).speaker, Speaker::Warning);
        app.submit("event party /from 2023-08-30 0100");
        assert_eq!(
            last(&app).text,
            TaskError::MissingToMarker.to_string()
        );
        app.submit("frobnicate");
        assert_eq!(last(&app).speaker, Speaker::Warning);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_reload_and_reminder() {
        let tmp = TempDir::new().unwrap();
        {
            let mut app = app_in(&tmp);
            app.submit("todo read book");
            app.submit("deadline old bill /by 2020-01-01 0900");
            app.submit("delete 1");
        }
        let mut app = app_in(&tmp);
        assert_eq!(app.tasks.len(), 1);
        assert!(app
            .log
            .iter()
            .any(|e| e.text.starts_with("Heads up!") && e.text.contains("old bill")));
        app.submit("remind");
        assert!(last(&app).text.contains("1. [D][ ] old bill"));
        app.submit("find BILL");
        assert!(last(&app).text.contains("old bill"));
    }

    #[test]
    fn test_corrupt_lines_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tasks.txt"), "T |   | fine\n? | ? | broken").unwrap();
        let app = app_in(&tmp);
        assert_eq!(app.tasks.len(), 1);
        assert!(app
            .log
            .iter()
            .any(|e| e.speaker == Speaker::Warning && e.text.contains("line 2")));
    }

    #[test]
    fn test_keys_edit_and_submit() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        for c in "listx".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "list");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.input.is_empty());
        assert_eq!(last(&app).text, "Your list is empty.");

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_bye_quits() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        app.submit("bye");
        assert!(app.should_quit);
    }
}
