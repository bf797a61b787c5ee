//! Daily checklist reset and task completion toggling.

use chrono::{DateTime, Utc};

use super::{StateStore, StoreError};
use crate::storage::LAST_RESET_KEY;
use crate::types::Period;

/// Format of the reset marker: the device-local calendar date.
const RESET_MARKER_FORMAT: &str = "%Y-%m-%d";

/// Result of [`StateStore::toggle_task_completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The task is now complete, stamped with this instant.
    Completed(DateTime<Utc>),
    /// The task was complete and has been reopened.
    Reopened,
    /// No task with that id in that period. Nothing changed.
    NotFound,
}

impl StateStore {
    /// Clear every daily task once per calendar day.
    ///
    /// Returns `true` when a reset ran. The marker is written even if the
    /// schedule has no daily period; the records are saved only when there
    /// was something to clear.
    pub fn reset_daily_checklist(&mut self) -> Result<bool, StoreError> {
        let today = self
            .clock
            .today()
            .format(RESET_MARKER_FORMAT)
            .to_string();
        let last = self.storage.get(LAST_RESET_KEY)?;
        if last.as_deref() == Some(today.as_str()) {
            return Ok(false);
        }

        if let Some(daily) = self.cleaning.get_mut(Period::Daily) {
            for task in &mut daily.tasks {
                task.clear_completion();
            }
            self.save()?;
        }
        self.storage.set(LAST_RESET_KEY, &today)?;
        log::info!(
            "daily checklist reset for {} (previous: {})",
            today,
            last.as_deref().unwrap_or("never")
        );
        Ok(true)
    }

    /// Flip one task's completion state and save.
    ///
    /// Completing stamps the current instant; reopening clears the stamp.
    /// An unknown id leaves everything untouched.
    pub fn toggle_task_completion(
        &mut self,
        task_id: &str,
        period: Period,
    ) -> Result<ToggleOutcome, StoreError> {
        let now = self.clock.now();
        let Some(task) = self.cleaning.find_task_mut(period, task_id) else {
            log::warn!("no {} task with id '{}'", period, task_id);
            return Ok(ToggleOutcome::NotFound);
        };
        let outcome = if task.toggle(now) {
            ToggleOutcome::Completed(now)
        } else {
            ToggleOutcome::Reopened
        };
        self.save()?;
        Ok(outcome)
    }

    /// `(completed, total)` for today's checklist.
    pub fn daily_progress(&self) -> (usize, usize) {
        self.cleaning.progress(Period::Daily)
    }
}
