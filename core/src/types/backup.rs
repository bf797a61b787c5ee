//! Backup document — `{menu, cleaning, settings, timestamp}`.
//!
//! Exports always carry all four fields. A restore accepts any subset; only
//! the fields present replace in-memory state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CleaningSchedule, MenuCatalog, Settings};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuCatalog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning: Option<CleaningSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::timestamp::option"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Backup {
    pub fn from_json(text: &str) -> Result<Backup, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty-printed JSON, the format written to backup files.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self.menu.is_none() && self.cleaning.is_none() && self.settings.is_none()
    }
}

/// File name offered for an export taken at `now`.
pub fn backup_file_name(now: &DateTime<Utc>) -> String {
    format!("cafe-manual-backup-{}.json", now.timestamp_millis())
}
