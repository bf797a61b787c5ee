//! TUI runner — ratatui event loop with terminal setup and cleanup.
//!
//! The [`Tui`] struct owns the ratatui terminal, the application state machine
//! ([`App`]), and the open [`StateStore`]. Every toggle is persisted through
//! the store before the next frame is drawn.

use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Terminal;

use cafe_manual_core::store::{StateStore, ToggleOutcome};
use cafe_manual_core::types::Period;

use crate::app::{App, AppAction, AppState, Key, Tab};
use crate::checklist;

/// History entries shown on the History tab.
pub const HISTORY_ROWS: usize = 10;


/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    store: StateStore,
    tick_rate: Duration,
}


impl Tui {
    /// Create a new TUI, entering raw mode and the alternate screen.
    pub fn new(store: StateStore) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            app: App::new(),
            store,
            tick_rate: Duration::from_millis(250),
        })
    }

    /// Run the main event loop until quit is requested.
    pub fn run(&mut self) -> Result<(), io::Error> {
        loop {
            let (app, store) = (&self.app, &self.store);
            self.terminal.draw(|frame| render_frame(frame, app, store))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }
                    // Ctrl-C always quits immediately.
                    if key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }

                    let key = crossterm_to_key(key_event.code, key_event.modifiers);
                    if let Some(action) = self.app.handle_key(key) {
                        if apply_action(&mut self.app, &mut self.store, action, now_ms()) {
                            break;
                        }
                    }
                }
            }

            self.app.clear_expired_status(now_ms());
        }

        self.shutdown()
    }

    /// Restore the terminal to its normal state.
    fn shutdown(&mut self) -> Result<(), io::Error> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}


impl Drop for Tui {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}


fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}


// ---------------------------------------------------------------------------
// Action handling
// ---------------------------------------------------------------------------

/// Apply an `AppAction` to the app and store.
///
/// Returns `true` if the application should quit. Store failures are shown
/// on the status line and logged.
pub fn apply_action(app: &mut App, store: &mut StateStore, action: AppAction, now_ms: u64) -> bool {
    match action {
        AppAction::Quit => return true,
        AppAction::SelectNext => {
            let len = rows_on_tab(store, app.tab);
            app.select_next(len.saturating_sub(1));
        }
        AppAction::SelectPrev => app.select_prev(),
        AppAction::ToggleTask { period, index } => {
            let Some(task) = store.cleaning().tasks(period).get(index) else {
                return false;
            };
            let (id, title) = (task.id.clone(), task.title.clone());
            let msg = match store.toggle_task_completion(&id, period) {
                Ok(ToggleOutcome::Completed(_)) => format!("Done: {}", title),
                Ok(ToggleOutcome::Reopened) => format!("Reopened: {}", title),
                Ok(ToggleOutcome::NotFound) => format!("Task '{}' is gone", id),
                Err(e) => {
                    log::error!("toggle {} failed: {}", id, e);
                    format!("Save failed: {}", e)
                }
            };
            app.set_status(&msg, now_ms);
        }
        AppAction::ToggleEditMode => {
            let enabled = !store.settings().edit_mode;
            let msg = match store.set_edit_mode(enabled) {
                Ok(()) if enabled => "Edit mode on".to_string(),
                Ok(()) => "Edit mode off".to_string(),
                Err(e) => {
                    log::error!("edit mode change failed: {}", e);
                    format!("Save failed: {}", e)
                }
            };
            app.set_status(&msg, now_ms);
        }
    }
    let len = rows_on_tab(store, app.tab);
    app.clamp_selection(len);
    false
}


fn rows_on_tab(store: &StateStore, tab: Tab) -> usize {
    match tab.period() {
        Some(period) => store.cleaning().tasks(period).len(),
        None => store.recent_history(HISTORY_ROWS).len(),
    }
}


// ---------------------------------------------------------------------------
// Rendering (free functions to avoid borrow conflicts)
// ---------------------------------------------------------------------------

/// Render the full screen layout: tabs, main content, progress, status.
fn render_frame(frame: &mut Frame, app: &App, store: &StateStore) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Min(5),    // main content
            Constraint::Length(1), // progress
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    checklist::render_tabs(frame, chunks[0], app.tab);
    render_main(frame, chunks[1], app, store);

    let (done, total) = store.daily_progress();
    let progress = checklist::format_progress(done, total, store.settings().edit_mode);
    frame.render_widget(Paragraph::new(progress), chunks[2]);

    render_status_bar(frame, chunks[3], app);
}

/// Dispatch main-area rendering based on the current app state.
fn render_main(frame: &mut Frame, area: Rect, app: &App, store: &StateStore) {
    if app.state == AppState::Help {
        let paragraph = Paragraph::new(HELP_TEXT)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    match app.tab.period() {
        Some(period) => render_period(frame, area, app, store, period),
        None => checklist::render_history(frame, area, store.recent_history(HISTORY_ROWS)),
    }
}

fn render_period(frame: &mut Frame, area: Rect, app: &App, store: &StateStore, period: Period) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(area);

    let tasks = store.cleaning().tasks(period);
    let (done, total) = store.cleaning().progress(period);
    let title = format!("{} ({}/{})", app.tab.label(), done, total);
    checklist::render_task_table(frame, chunks[0], &title, tasks, app.selected_index);
    checklist::render_task_detail(frame, chunks[1], tasks.get(app.selected_index));
}

/// Render the bottom status line.
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match app.status_message() {
        Some(msg) => (format!(" {}", msg), Style::default().fg(Color::Cyan)),
        None => (
            " space toggle | tab switch | e edit mode | ? help | q quit".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

const HELP_TEXT: &str = concat!(
    "Cleaning checklist\n",
    "\n",
    "  j/k, arrows     Select task\n",
    "  space, Enter    Mark done / undo\n",
    "  Tab, l          Next tab\n",
    "  Shift-Tab, h    Previous tab\n",
    "  1-4             Jump to tab\n",
    "  e               Toggle edit mode\n",
    "  ?               Show this help\n",
    "  q, Escape       Quit\n",
    "  Ctrl-C          Force quit\n",
    "\n",
    "The daily list is cleared the first time it is opened each day.\n",
);


// ---------------------------------------------------------------------------
// Key conversion
// ---------------------------------------------------------------------------

/// Convert a crossterm key event to our simplified `Key`.
pub fn crossterm_to_key(code: KeyCode, modifiers: KeyModifiers) -> Key {
    if modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(ch) = code {
            return Key::Ctrl(ch);
        }
    }
    match code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Other,
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_manual_core::baseline::Baseline;
    use cafe_manual_core::clock::FixedClock;
    use cafe_manual_core::storage::MemoryStorage;

    fn store() -> StateStore {
        StateStore::open(
            Box::new(MemoryStorage::new()),
            Baseline::bundled().unwrap(),
            Box::new(FixedClock::at("2026-04-10T09:00:00Z").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn crossterm_key_mapping() {
        assert_eq!(crossterm_to_key(KeyCode::Char('j'), KeyModifiers::NONE), Key::Char('j'));
        assert_eq!(crossterm_to_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Key::Ctrl('c'));
        assert_eq!(crossterm_to_key(KeyCode::BackTab, KeyModifiers::SHIFT), Key::BackTab);
        assert_eq!(crossterm_to_key(KeyCode::Esc, KeyModifiers::NONE), Key::Escape);
        assert_eq!(crossterm_to_key(KeyCode::F(5), KeyModifiers::NONE), Key::Other);
    }

    #[test]
    fn quit_action_stops_loop() {
        let (mut app, mut store) = (App::new(), store());
        assert!(apply_action(&mut app, &mut store, AppAction::Quit, 0));
    }

    #[test]
    fn toggle_selected_task_persists_and_reports() {
        let (mut app, mut store) = (App::new(), store());
        let key_action = app.handle_key(Key::Char(' ')).unwrap();
        assert!(!apply_action(&mut app, &mut store, key_action, 10));
        assert_eq!(store.daily_progress(), (1, 6));
        assert!(app.status_message().unwrap().starts_with("Done: "));

        let key_action = app.handle_key(Key::Enter).unwrap();
        apply_action(&mut app, &mut store, key_action, 20);
        assert_eq!(store.daily_progress(), (0, 6));
        assert!(app.status_message().unwrap().starts_with("Reopened: "));
    }

    #[test]
    fn selection_clamps_to_task_count() {
        let (mut app, mut store) = (App::new(), store());
        for _ in 0..10 {
            apply_action(&mut app, &mut store, AppAction::SelectNext, 0);
        }
        assert_eq!(app.selected_index, 5);

        // weekly has four tasks
        app.set_tab(Tab::Weekly);
        for _ in 0..10 {
            apply_action(&mut app, &mut store, AppAction::SelectNext, 0);
        }
        assert_eq!(app.selected_index, 3);
    }

    #[test]
    fn toggle_out_of_range_is_ignored() {
        let (mut app, mut store) = (App::new(), store());
        let history = store.history().len();
        apply_action(
            &mut app,
            &mut store,
            AppAction::ToggleTask { period: Period::Monthly, index: 99 },
            0,
        );
        assert_eq!(store.history().len(), history);
        assert!(app.status_message().is_none());
    }

    #[test]
    fn edit_mode_toggles() {
        let (mut app, mut store) = (App::new(), store());
        apply_action(&mut app, &mut store, AppAction::ToggleEditMode, 0);
        assert!(store.settings().edit_mode);
        assert_eq!(app.status_message(), Some("Edit mode on"));
        apply_action(&mut app, &mut store, AppAction::ToggleEditMode, 0);
        assert!(!store.settings().edit_mode);
    }

    #[test]
    fn history_tab_rows() {
        let (mut app, mut store) = (App::new(), store());
        for _ in 0..15 {
            apply_action(&mut app, &mut store, AppAction::ToggleEditMode, 0);
        }
        assert_eq!(rows_on_tab(&store, Tab::History), HISTORY_ROWS);
    }
}
