//! Update History — a newest-first log capped at [`HISTORY_LIMIT`] entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept; older ones are dropped.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateEntry {
    pub message: String,
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct UpdateHistory {
    entries: Vec<UpdateEntry>,
}

impl UpdateHistory {
    pub fn new() -> Self {
        UpdateHistory::default()
    }

    /// Build from stored entries, enforcing the cap.
    pub fn from_entries(mut entries: Vec<UpdateEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        UpdateHistory { entries }
    }

    /// Prepend an entry and drop whatever falls past the cap.
    pub fn record(&mut self, message: &str, now: DateTime<Utc>) {
        self.entries.insert(
            0,
            UpdateEntry {
                message: message.to_string(),
                timestamp: now,
            },
        );
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    /// The `n` most recent entries.
    pub fn recent(&self, n: usize) -> &[UpdateEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn latest(&self) -> Option<&UpdateEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
