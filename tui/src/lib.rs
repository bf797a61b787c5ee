//! Terminal UI for the cafe cleaning checklist.
//!
//! # Modules
//!
//! - [`app`] — Tab / selection state machine and key routing
//! - [`checklist`] — ratatui widgets for task tables and update history
//! - [`tui`] — Terminal setup, event loop and action handling

pub mod app;
pub mod checklist;
pub mod tui;
