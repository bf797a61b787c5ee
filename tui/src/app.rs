//! Checklist TUI application state machine.
//!
//! Tracks which tab is showing, which row is selected, and the transient
//! status line. It does not touch the store; key handling produces an
//! [`AppAction`] that the runner applies.

use cafe_manual_core::types::Period;


// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

/// The four tabs across the top of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Daily,
    Weekly,
    Monthly,
    History,
}


impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Daily, Tab::Weekly, Tab::Monthly, Tab::History];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Daily => "Daily",
            Tab::Weekly => "Weekly",
            Tab::Monthly => "Monthly",
            Tab::History => "History",
        }
    }

    /// The checklist period shown on this tab. `None` for History.
    pub fn period(&self) -> Option<Period> {
        match self {
            Tab::Daily => Some(Period::Daily),
            Tab::Weekly => Some(Period::Weekly),
            Tab::Monthly => Some(Period::Monthly),
            Tab::History => None,
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}


// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The current view the user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Tabbed checklist / history view.
    Browse,
    /// Key binding overlay.
    Help,
}


impl AppState {
    /// Return a short label for this state, suitable for display in headers.
    pub fn label(&self) -> &str {
        match self {
            AppState::Browse => "browse",
            AppState::Help => "help",
        }
    }
}


// ---------------------------------------------------------------------------
// AppAction
// ---------------------------------------------------------------------------

/// An action produced by the application in response to user input.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application.
    Quit,
    /// Flip completion of the task at `index` in `period`.
    ToggleTask { period: Period, index: usize },
    /// Flip the edit-mode setting.
    ToggleEditMode,
    /// Select the next row.
    SelectNext,
    /// Select the previous row.
    SelectPrev,
}


// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    /// Current view state.
    pub state: AppState,
    /// Tab shown in the browse view.
    pub tab: Tab,
    /// Index of the currently selected row.
    pub selected_index: usize,
    /// Transient status message with the time (ms) it was set.
    status_message: Option<(String, u64)>,
    /// Time-to-live for status messages in milliseconds.
    status_ttl_ms: u64,
}


impl App {
    pub fn new() -> Self {
        App {
            state: AppState::Browse,
            tab: Tab::Daily,
            selected_index: 0,
            status_message: None,
            status_ttl_ms: 5000,
        }
    }

    // -------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------

    /// Switch tabs, resetting the selection.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected_index = 0;
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.set_tab(self.tab.prev());
    }

    // -------------------------------------------------------------------
    // Status messages
    // -------------------------------------------------------------------

    /// Set a transient status message with the given timestamp.
    pub fn set_status(&mut self, msg: &str, now_ms: u64) {
        self.status_message = Some((msg.to_string(), now_ms));
    }

    /// Clear the status message if it has expired relative to `now_ms`.
    pub fn clear_expired_status(&mut self, now_ms: u64) {
        if let Some((_, created)) = &self.status_message {
            if now_ms.saturating_sub(*created) >= self.status_ttl_ms {
                self.status_message = None;
            }
        }
    }

    /// Return the current status message, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(msg, _)| msg.as_str())
    }

    // -------------------------------------------------------------------
    // Input processing
    // -------------------------------------------------------------------

    /// Process a key event and return an optional action.
    pub fn handle_key(&mut self, key: Key) -> Option<AppAction> {
        match self.state {
            AppState::Help => self.handle_help_key(key),
            AppState::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_help_key(&mut self, key: Key) -> Option<AppAction> {
        match key {
            Key::Char('q') | Key::Char('?') | Key::Escape | Key::Enter => {
                self.state = AppState::Browse;
                None
            }
            _ => None,
        }
    }

    fn handle_browse_key(&mut self, key: Key) -> Option<AppAction> {
        match key {
            Key::Char('q') | Key::Escape => Some(AppAction::Quit),
            Key::Char('?') => {
                self.state = AppState::Help;
                None
            }
            Key::Char('j') | Key::Down => Some(AppAction::SelectNext),
            Key::Char('k') | Key::Up => Some(AppAction::SelectPrev),
            Key::Tab | Key::Char('l') | Key::Right => {
                self.next_tab();
                None
            }
            Key::BackTab | Key::Char('h') | Key::Left => {
                self.prev_tab();
                None
            }
            Key::Char('1') => {
                self.set_tab(Tab::Daily);
                None
            }
            Key::Char('2') => {
                self.set_tab(Tab::Weekly);
                None
            }
            Key::Char('3') => {
                self.set_tab(Tab::Monthly);
                None
            }
            Key::Char('4') => {
                self.set_tab(Tab::History);
                None
            }
            Key::Char(' ') | Key::Enter => self.tab.period().map(|period| AppAction::ToggleTask {
                period,
                index: self.selected_index,
            }),
            Key::Char('e') => Some(AppAction::ToggleEditMode),
            _ => None,
        }
    }

    // -------------------------------------------------------------------
    // Selection helpers
    // -------------------------------------------------------------------

    /// Move the selection index up, clamping to 0.
    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Move the selection index down, clamping to `max_index`.
    pub fn select_next(&mut self, max_index: usize) {
        if self.selected_index < max_index {
            self.selected_index += 1;
        }
    }

    /// Pull the selection back inside a list of `len` rows.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }
}


impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}


// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A simplified key event for the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Ctrl(char),
    Other,
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction ---

    #[test]
    fn new_starts_on_daily_tab() {
        let app = App::new();
        assert_eq!(app.state, AppState::Browse);
        assert_eq!(app.tab, Tab::Daily);
        assert_eq!(app.selected_index, 0);
        assert!(app.status_message().is_none());
    }

    #[test]
    fn default_is_new() {
        let app = App::default();
        assert_eq!(app.tab, Tab::Daily);
    }

    // --- Tabs ---

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(Tab::Daily.next(), Tab::Weekly);
        assert_eq!(Tab::History.next(), Tab::Daily);
        assert_eq!(Tab::Daily.prev(), Tab::History);
        assert_eq!(Tab::Monthly.prev(), Tab::Weekly);
    }

    #[test]
    fn tab_periods() {
        assert_eq!(Tab::Daily.period(), Some(Period::Daily));
        assert_eq!(Tab::Monthly.period(), Some(Period::Monthly));
        assert_eq!(Tab::History.period(), None);
    }

    #[test]
    fn tab_keys_switch_and_reset_selection() {
        let mut app = App::new();
        app.selected_index = 3;
        assert_eq!(app.handle_key(Key::Tab), None);
        assert_eq!(app.tab, Tab::Weekly);
        assert_eq!(app.selected_index, 0);
        app.handle_key(Key::Char('l'));
        assert_eq!(app.tab, Tab::Monthly);
        app.handle_key(Key::BackTab);
        assert_eq!(app.tab, Tab::Weekly);
        app.handle_key(Key::Char('h'));
        assert_eq!(app.tab, Tab::Daily);
        app.handle_key(Key::Char('4'));
        assert_eq!(app.tab, Tab::History);
    }

    // --- Browse keys ---

    #[test]
    fn quit_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(Key::Char('q')), Some(AppAction::Quit));
        assert_eq!(app.handle_key(Key::Escape), Some(AppAction::Quit));
    }

    #[test]
    fn selection_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(Key::Char('j')), Some(AppAction::SelectNext));
        assert_eq!(app.handle_key(Key::Down), Some(AppAction::SelectNext));
        assert_eq!(app.handle_key(Key::Char('k')), Some(AppAction::SelectPrev));
        assert_eq!(app.handle_key(Key::Up), Some(AppAction::SelectPrev));
    }

    #[test]
    fn space_and_enter_toggle_selected_task() {
        let mut app = App::new();
        app.set_tab(Tab::Weekly);
        app.selected_index = 2;
        let expected = Some(AppAction::ToggleTask { period: Period::Weekly, index: 2 });
        assert_eq!(app.handle_key(Key::Char(' ')), expected);
        assert_eq!(app.handle_key(Key::Enter), expected);
    }

    #[test]
    fn toggle_does_nothing_on_history_tab() {
        let mut app = App::new();
        app.set_tab(Tab::History);
        assert_eq!(app.handle_key(Key::Char(' ')), None);
    }

    #[test]
    fn edit_mode_key() {
        let mut app = App::new();
        assert_eq!(app.handle_key(Key::Char('e')), Some(AppAction::ToggleEditMode));
    }

    #[test]
    fn unhandled_key_returns_none() {
        let mut app = App::new();
        assert_eq!(app.handle_key(Key::Char('z')), None);
        assert_eq!(app.handle_key(Key::Other), None);
    }

    // --- Help ---

    #[test]
    fn help_opens_and_closes() {
        let mut app = App::new();
        app.handle_key(Key::Char('?'));
        assert_eq!(app.state, AppState::Help);
        assert_eq!(app.state.label(), "help");
        // keys other than close are swallowed
        assert_eq!(app.handle_key(Key::Char('j')), None);
        assert_eq!(app.handle_key(Key::Char('q')), None);
        assert_eq!(app.state, AppState::Browse);
    }

    // --- Selection helpers ---

    #[test]
    fn select_next_clamps_at_max() {
        let mut app = App::new();
        app.select_next(1);
        app.select_next(1);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn select_prev_clamps_at_zero() {
        let mut app = App::new();
        app.select_prev();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn clamp_selection_to_shorter_list() {
        let mut app = App::new();
        app.selected_index = 5;
        app.clamp_selection(3);
        assert_eq!(app.selected_index, 2);
        app.clamp_selection(0);
        assert_eq!(app.selected_index, 0);
    }

    // --- Status ---

    #[test]
    fn status_expires_after_ttl() {
        let mut app = App::new();
        app.set_status("Saved", 1000);
        app.clear_expired_status(5999);
        assert_eq!(app.status_message(), Some("Saved"));
        app.clear_expired_status(6000);
        assert!(app.status_message().is_none());
    }
}
