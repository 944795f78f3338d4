//! UI rendering for the task tracker.

use crate::app::{App, Speaker};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);
    draw_log(f, app, chunks[1]);
    draw_input(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Task Tracker",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", app.storage.path().display())),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let lines = log_lines(app);

    // Keep the newest line at the bottom unless scrolled back.
    let height = area.height.saturating_sub(2) as usize;
    let max_top = lines.len().saturating_sub(height);
    let top = max_top.saturating_sub(app.scroll_back as usize);

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Conversation "))
        .scroll((top.min(u16::MAX as usize) as u16, 0));
    f.render_widget(log, area);
}

fn log_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for entry in &app.log {
        let (prefix, style) = match entry.speaker {
            Speaker::User => ("> ", Style::default().fg(Color::Cyan)),
            Speaker::Tracker => ("", Style::default()),
            Speaker::Warning => ("! ", Style::default().fg(Color::Red)),
        };
        for (i, text) in entry.text.lines().enumerate() {
            let lead = if i == 0 { prefix } else { "  " };
            lines.push(Line::from(Span::styled(format!("{}{}", lead, text), style)));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Command "))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(input, area);

    let x = area.x + 1 + app.input.chars().count().min(u16::MAX as usize) as u16;
    f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let stats = format!(
        "Total: {} | Done: {} | Due soon: {}",
        app.stats.total, app.stats.done, app.stats.due_soon,
    );
    let mut style = Style::default();
    if app.stats.due_soon > 0 {
        style = style.fg(Color::Red);
    }
    let stats_widget = Paragraph::new(stats)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(stats_widget, chunks[0]);

    let hint = Paragraph::new("Enter to send | Up/Down scroll | Ctrl-C or bye to quit")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(hint, chunks[1]);
}
