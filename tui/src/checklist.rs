//! Checklist and history views, rendered with ratatui widgets.

use chrono::{DateTime, Local, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};

use cafe_manual_core::types::{Task, UpdateEntry};

use crate::app::Tab;


/// Render the tab strip, highlighting `current`.
pub fn render_tabs(frame: &mut Frame, area: Rect, current: Tab) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.label()).collect();
    let tabs = Tabs::new(titles)
        .select(current.index())
        .style(Style::default().bg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(tabs, area);
}


/// Render one period's task table with a highlighted selection row.
pub fn render_task_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    tasks: &[Task],
    selected: usize,
) {
    let header = Row::new(vec!["", "Task", "Done at"]).style(Style::default().bold());

    let rows: Vec<Row> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let style = if i == selected {
                Style::default().bg(Color::DarkGray)
            } else {
                task_style(task)
            };
            Row::new(vec![
                Cell::from(status_symbol(task.completed)),
                Cell::from(task.title.clone()),
                Cell::from(format_completed_at(task.completed_at.as_ref())),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3), // check
            Constraint::Fill(1),   // title
            Constraint::Length(12), // done at
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    frame.render_widget(table, area);
}


/// Render the description of the selected task under the table.
pub fn render_task_detail(frame: &mut Frame, area: Rect, task: Option<&Task>) {
    let text = match task {
        Some(t) => task_detail_text(t),
        None => "No tasks in this period.".into(),
    };
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP))
        .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(paragraph, area);
}


/// Render the update history list, newest first.
pub fn render_history(frame: &mut Frame, area: Rect, entries: &[UpdateEntry]) {
    let rows: Vec<Row> = entries
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(format_local(&e.timestamp, "%m/%d %H:%M")),
                Cell::from(e.message.clone()),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Fill(1)])
        .block(Block::default().borders(Borders::ALL).title("Recent updates"));
    frame.render_widget(table, area);
}


/// Description followed by one line per reference image.
fn task_detail_text(task: &Task) -> String {
    let mut lines = Vec::new();
    if !task.description.is_empty() {
        lines.push(task.description.clone());
    }
    for image in task.images() {
        if image.alt.is_empty() {
            lines.push(format!("image: {}", image.path));
        } else {
            lines.push(format!("image: {} ({})", image.path, image.alt));
        }
    }
    lines.join("\n")
}


/// Return the checkbox shown for a task.
fn status_symbol(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}


fn task_style(task: &Task) -> Style {
    if task.completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}


/// One-line daily progress counter.
pub fn format_progress(done: usize, total: usize, edit_mode: bool) -> String {
    let mut text = format!("Today: {}/{} done", done, total);
    if total > 0 && done == total {
        text.push_str("  \u{2714} all clear");
    }
    if edit_mode {
        text.push_str("  [edit mode]");
    }
    text
}


fn format_completed_at(at: Option<&DateTime<Utc>>) -> String {
    match at {
        Some(ts) => format_local(ts, "%m/%d %H:%M"),
        None => "--".into(),
    }
}


fn format_local(ts: &DateTime<Utc>, fmt: &str) -> String {
    ts.with_timezone(&Local).format(fmt).to_string()
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
