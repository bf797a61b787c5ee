//! Update History persistence.

use super::{write_json, StateStore, StoreError};
use crate::storage::UPDATE_HISTORY_KEY;
use crate::types::UpdateEntry;

pub const SAVE_MESSAGE: &str = "Data saved";
pub const CALENDAR_UPDATED_MESSAGE: &str = "Calendar settings updated";
pub const CALENDAR_REMOVED_MESSAGE: &str = "Calendar settings removed";

impl StateStore {
    /// Prepend a timestamped entry and persist the capped log. The
    /// in-memory log only changes once the write succeeds.
    pub fn record_history(&mut self, message: &str) -> Result<(), StoreError> {
        let mut history = self.history.clone();
        history.record(message, self.clock.now());
        write_json(self.storage.as_mut(), UPDATE_HISTORY_KEY, &history)?;
        self.history = history;
        log::debug!("history: {}", message);
        Ok(())
    }

    /// Newest entries first, at most `n`.
    pub fn recent_history(&self, n: usize) -> &[UpdateEntry] {
        self.history.recent(n)
    }
}
