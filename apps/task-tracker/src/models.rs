//! Data models for the task tracker.

use crate::datetime::{format_stored, parse_stored};
use chrono::{Duration, NaiveDateTime};
use std::fmt;

/// Separator between persisted fields.
const FIELD_SEP: &str = " | ";
/// Separator between an event's start and end in a persisted line.
const RANGE_SEP: &str = " to ";

/// What kind of task this is, with its variant-specific dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { due: NaiveDateTime },
    Event { start: NaiveDateTime, end: NaiveDateTime },
}

impl TaskKind {
    /// One-letter tag used in both display and persisted forms.
    pub fn tag(&self) -> &'static str {
        match self {
            TaskKind::Todo => "T",
            TaskKind::Deadline { .. } => "D",
            TaskKind::Event { .. } => "E",
        }
    }

    /// The date a reminder is measured against.
    ///
    /// Events count from their end.
    pub fn reference_date(&self) -> Option<NaiveDateTime> {
        match self {
            TaskKind::Todo => None,
            TaskKind::Deadline { due } => Some(*due),
            TaskKind::Event { end, .. } => Some(*end),
        }
    }
}

/// A task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    pub kind: TaskKind,
}

impl Task {
    pub fn new(description: &str, kind: TaskKind) -> Self {
        Self {
            description: description.to_string(),
            done: false,
            kind,
        }
    }

    pub fn todo(description: &str) -> Self {
        Self::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: &str, due: NaiveDateTime) -> Self {
        Self::new(description, TaskKind::Deadline { due })
    }

    pub fn event(description: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(description, TaskKind::Event { start, end })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    pub fn status_icon(&self) -> &'static str {
        if self.done {
            "X"
        } else {
            " "
        }
    }

    /// True when `now` falls inside the reminder window ending at the task's
    /// date, or the date has already passed. Todos are never due.
    ///
    /// A window reaching past the earliest representable date covers everything.
    pub fn is_within_due(&self, now: NaiveDateTime, window: Duration) -> bool {
        match self.kind.reference_date() {
            Some(date) => date
                .checked_sub_signed(window)
                .map_or(true, |start| now >= start),
            None => false,
        }
    }

    /// Render as one line of the task file.
    pub fn to_persisted_line(&self) -> String {
        let mut line = format!(
            "{}{sep}{}{sep}{}",
            self.kind.tag(),
            self.status_icon(),
            self.description,
            sep = FIELD_SEP
        );
        match &self.kind {
            TaskKind::Todo => {}
            TaskKind::Deadline { due } => {
                line.push_str(FIELD_SEP);
                line.push_str(&format_stored(due));
            }
            TaskKind::Event { start, end } => {
                line.push_str(FIELD_SEP);
                line.push_str(&format_stored(start));
                line.push_str(RANGE_SEP);
                line.push_str(&format_stored(end));
            }
        }
        line
    }

    /// Rebuild a task from a line written by [`Task::to_persisted_line`].
    ///
    /// The error is a human-readable reason; the caller attaches the line number.
    pub fn from_persisted_line(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
        let mut fields = line.splitn(3, FIELD_SEP);
        let tag = fields.next().unwrap_or_default();
        let done = match fields.next() {
            Some("X") => true,
            Some(" ") => false,
            Some(other) => return Err(format!("unknown done marker {:?}", other)),
            None => return Err("missing done field".to_string()),
        };
        let rest = fields
            .next()
            .ok_or_else(|| "missing description".to_string())?;

        let mut task = match tag {
            "T" => Task::todo(rest),
            "D" => {
                let (description, due) = split_date_field(rest)?;
                Task::deadline(description, parse_date(due)?)
            }
            "E" => {
                let (description, range) = split_date_field(rest)?;
                let (start, end) = range
                    .split_once(RANGE_SEP)
                    .ok_or_else(|| format!("event dates {:?} lack \"to\"", range))?;
                Task::event(description, parse_date(start)?, parse_date(end)?)
            }
            other => return Err(format!("unknown task type {:?}", other)),
        };

        if task.description.trim().is_empty() {
            return Err("empty description".to_string());
        }
        if done {
            task.mark_done();
        }
        Ok(task)
    }
}

fn split_date_field(rest: &str) -> Result<(&str, &str), String> {
    rest.rsplit_once(FIELD_SEP)
        .ok_or_else(|| "missing date field".to_string())
}

fn parse_date(s: &str) -> Result<NaiveDateTime, String> {
    parse_stored(s).ok_or_else(|| format!("unreadable date {:?}", s))
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {}",
            self.kind.tag(),
            self.status_icon(),
            self.description
        )?;
        match &self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { due } => write!(f, " (by: {})", format_stored(due)),
            TaskKind::Event { start, end } => write!(
                f,
                " (from: {} to: {})",
                format_stored(start),
                format_stored(end)
            ),
        }
    }
}

/// Counts shown in the status bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub done: usize,
    pub due_soon: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_display_strings() {
        let mut todo = Task::todo("read book");
        assert_eq!(todo.to_string(), "[T][ ] read book");
        todo.mark_done();
        assert_eq!(todo.to_string(), "[T][X] read book");

        let deadline = Task::deadline("submit report", at(2023, 8, 30, 1, 0));
        assert_eq!(
            deadline.to_string(),
            "[D][ ] submit report (by: Aug 30 2023 01:00AM)"
        );

        let event = Task::event("meeting", at(2023, 8, 30, 1, 0), at(2023, 8, 30, 15, 0));
        assert_eq!(
            event.to_string(),
            "[E][ ] meeting (from: Aug 30 2023 01:00AM to: Aug 30 2023 03:00PM)"
        );
    }

    #[test]
    fn test_persisted_lines() {
        assert_eq!(Task::todo("read book").to_persisted_line(), "T |   | read book");

        let mut deadline = Task::deadline("submit report", at(2023, 8, 30, 1, 0));
        assert_eq!(
            deadline.to_persisted_line(),
            "D |   | submit report | Aug 30 2023 01:00AM"
        );
        deadline.mark_done();
        assert_eq!(
            deadline.to_persisted_line(),
            "D | X | submit report | Aug 30 2023 01:00AM"
        );

        let event = Task::event("meeting", at(2023, 8, 30, 1, 0), at(2023, 8, 30, 3, 0));
        assert_eq!(
            event.to_persisted_line(),
            "E |   | meeting | Aug 30 2023 01:00AM to Aug 30 2023 03:00AM"
        );
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut task = Task::todo("x");
        task.mark_done();
        task.mark_done();
        assert!(task.is_done());
        task.mark_not_done();
        task.mark_not_done();
        assert!(!task.is_done());
    }

    #[test]
    fn test_parse_keeps_pipes_in_description() {
        let task = Task::from_persisted_line("D | X | a | b | Aug 30 2023 01:00AM\r").unwrap();
        assert_eq!(task.description(), "a | b");
        assert!(task.is_done());
        assert_eq!(task.kind, TaskKind::Deadline { due: at(2023, 8, 30, 1, 0) });
    }

    #[test]
    fn test_parse_rejects_corrupt_lines() {
        assert!(Task::from_persisted_line("Q |   | what").is_err());
        assert!(Task::from_persisted_line("T").is_err());
        assert!(Task::from_persisted_line("T | ? | x").is_err());
        assert!(Task::from_persisted_line("T |   | ").is_err());
        assert!(Task::from_persisted_line("D |   | no date").is_err());
        assert!(Task::from_persisted_line("D |   | x | yesterday").is_err());
        assert!(Task::from_persisted_line("E |   | x | Aug 30 2023 01:00AM").is_err());
    }

    #[test]
    fn test_reminder_window_boundary() {
        let deadline = Task::deadline("pay rent", at(2023, 9, 2, 12, 0));
        let window = Duration::hours(24);
        assert!(!deadline.is_within_due(at(2023, 9, 1, 11, 59), window));
        assert!(deadline.is_within_due(at(2023, 9, 1, 12, 0), window));
        assert!(deadline.is_within_due(at(2023, 9, 5, 0, 0), window));
    }

    #[test]
    fn test_event_due_uses_end() {
        let event = Task::event("conference", at(2023, 9, 1, 9, 0), at(2023, 9, 3, 17, 0));
        let window = Duration::hours(24);
        assert!(!event.is_within_due(at(2023, 9, 2, 16, 59), window));
        assert!(event.is_within_due(at(2023, 9, 2, 17, 0), window));
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let deadline = Task::deadline("far away", at(2099, 1, 1, 0, 0));
        let window = Duration::try_weeks(1_000_000_000).unwrap();
        assert!(deadline.is_within_due(at(1970, 1, 1, 0, 0), window));
        assert!(!Task::todo("x").is_within_due(at(1970, 1, 1, 0, 0), window));
    }

    #[test]
    fn test_todo_never_due() {
        let todo = Task::todo("someday");
        assert!(!todo.is_within_due(at(2100, 1, 1, 0, 0), Duration::hours(24)));
    }

    fn arb_date_time() -> impl Strategy<Value = NaiveDateTime> {
        (1970i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60)
            .prop_map(|(y, m, d, h, min)| at(y, m, d, h, min))
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        let kind = prop_oneof![
            Just(TaskKind::Todo),
            arb_date_time().prop_map(|due| TaskKind::Deadline { due }),
            (arb_date_time(), arb_date_time()).prop_map(|(start, end)| TaskKind::Event { start, end }),
        ];
        ("[a-zA-Z0-9][a-zA-Z0-9 ,.!?-]{0,30}", any::<bool>(), kind).prop_map(|(desc, done, kind)| {
            let mut task = Task::new(&desc, kind);
            if done {
                task.mark_done();
            }
            task
        })
    }

    proptest! {
        #[test]
        fn test_persisted_line_round_trip(task in arb_task()) {
            let line = task.to_persisted_line();
            let parsed = Task::from_persisted_line(&line);
            prop_assert_eq!(parsed, Ok(task));
        }
    }
}
