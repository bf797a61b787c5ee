//! Command — the typed interface for every operation `Sys::execute()` runs.
//!
//! Commands serialize as JSON objects with a `"command"` discriminant:
//!
//! ```json
//! {"command": "status"}
//! {"command": "task.toggle", "period": "daily", "id": "daily-3"}
//! {"command": "calendar.set", "markup": "<iframe ...></iframe>"}
//! ```
//!
//! | Group | Commands |
//! |-------|----------|
//! | Top-level | `status`, `help`, `tui` |
//! | Checklist | `task.list`, `task.toggle`, `history.list` |
//! | Settings | `settings.edit_mode` |
//! | Calendar | `calendar.show`, `calendar.set`, `calendar.clear` |
//! | Backup | `backup.export`, `backup.restore` |
//! | Reference | `menu.list`, `menu.show`, `service.show`, `troubleshooting.list`, `hygiene.show`, `airpay.show` |

use serde::{Deserialize, Serialize};

/// Outcome of one command, printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { output: String },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    // -----------------------------------------------------------------
    // Top-level commands
    // -----------------------------------------------------------------

    /// Daily progress, edit mode and the latest update.
    #[serde(rename = "status")]
    Status,

    #[serde(rename = "help")]
    Help {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },

    /// Interactive checklist. Handled by the binary, not the dispatcher.
    #[serde(rename = "tui")]
    Tui,

    // -----------------------------------------------------------------
    // Checklist
    // -----------------------------------------------------------------

    /// List tasks for one period, or all periods when omitted.
    #[serde(rename = "task.list")]
    TaskList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period: Option<String>,
    },

    #[serde(rename = "task.toggle")]
    TaskToggle { period: String, id: String },

    #[serde(rename = "history.list")]
    HistoryList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },

    // -----------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------

    #[serde(rename = "settings.edit_mode")]
    EditMode { enabled: bool },

    // -----------------------------------------------------------------
    // Calendar
    // -----------------------------------------------------------------

    #[serde(rename = "calendar.show")]
    CalendarShow,

    #[serde(rename = "calendar.set")]
    CalendarSet { markup: String },

    #[serde(rename = "calendar.clear")]
    CalendarClear,

    // -----------------------------------------------------------------
    // Backup
    // -----------------------------------------------------------------

    /// Write a backup file. `dir` defaults to the configured backup dir.
    #[serde(rename = "backup.export")]
    BackupExport {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dir: Option<String>,
    },

    #[serde(rename = "backup.restore")]
    BackupRestore { path: String },

    // -----------------------------------------------------------------
    // Reference content
    // -----------------------------------------------------------------

    #[serde(rename = "menu.list")]
    MenuList,

    #[serde(rename = "menu.show")]
    MenuShow { id: String },

    /// One service manual section, or the section list.
    #[serde(rename = "service.show")]
    ServiceShow {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section: Option<String>,
    },

    #[serde(rename = "troubleshooting.list")]
    TroubleshootingList,

    /// `audience` is `staff` (default) or `manager`.
    #[serde(rename = "hygiene.show")]
    HygieneShow {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audience: Option<String>,
    },

    #[serde(rename = "airpay.show")]
    AirpayShow,
}
