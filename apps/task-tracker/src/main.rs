//! Task Tracker - personal to-dos, deadlines and events in the terminal.
//!
//! Features:
//! - Todos, deadlines (`/by`) and events (`/from` ... `/to`)
//! - Mark, unmark, delete, find and due-soon reminders
//! - Plain-text task file, rewritten after every change

mod app;
mod command;
mod config;
mod datetime;
mod error;
mod models;
mod storage;
mod tasks;
mod ui;

use anyhow::Result;
use app::App;
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::OpenOptions, io, sync::Mutex, time::Duration};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::load();
    init_logging(&config);
    if Config::config_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = config.save() {
            tracing::warn!(error = %e, "could not write default config");
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}

/// Log to a file next to the task file; the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let _ = std::fs::create_dir_all(&config.storage.dir);
    let path = config.storage.dir.join("task-tracker.log");
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("TASK_TRACKER_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
