//! Configuration for the task tracker.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::from_toml(&s))
            .unwrap_or_default()
    }

    pub fn from_toml(s: &str) -> Option<Self> {
        toml::from_str(s).ok()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "task-tracker")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Reminder window; negative hours count as zero, and values too large
    /// for a `Duration` fall back to the default.
    pub fn reminder_window(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.reminder.window_hours.max(0)).unwrap_or_else(|| {
            tracing::warn!(
                window_hours = self.reminder.window_hours,
                "reminder window out of range, using default"
            );
            chrono::Duration::hours(default_window_hours())
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_file")]
    pub file: String,
}

fn default_dir() -> PathBuf { PathBuf::from("data") }
fn default_file() -> String { "tasks.txt".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            file: default_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderConfig {
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
    #[serde(default = "default_true")]
    pub show_on_startup: bool,
}

fn default_true() -> bool { true }
fn default_window_hours() -> i64 { 24 }

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_hours: 24,
            show_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
