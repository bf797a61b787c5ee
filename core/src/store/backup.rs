//! Backup export and restore.

use std::path::{Path, PathBuf};

use super::{StateStore, StoreError};
use crate::types::{backup_file_name, Backup};

impl StateStore {
    /// Snapshot of menu, cleaning and settings, stamped with the current time.
    ///
    /// The Service Manual is not part of a backup.
    pub fn export_backup(&self) -> Backup {
        Backup {
            menu: Some(self.menu.clone()),
            cleaning: Some(self.cleaning.clone()),
            settings: Some(self.settings.clone()),
            timestamp: Some(self.clock.now()),
        }
    }

    /// Write an export into `dir` under a timestamped name. Returns the path.
    pub fn write_backup(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let backup = self.export_backup();
        let name = backup_file_name(&self.clock.now());
        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, backup.to_pretty_json()?)?;
        log::info!("backup written to {}", path.display());
        Ok(path)
    }

    /// Replace whichever records the backup carries, then save.
    ///
    /// Replacement is wholesale: a restored menu is not merged with the
    /// baseline until the next load.
    pub fn restore(&mut self, backup: Backup) -> Result<(), StoreError> {
        let Backup {
            menu,
            cleaning,
            settings,
            timestamp,
        } = backup;
        if let Some(menu) = menu {
            self.menu = menu;
        }
        if let Some(cleaning) = cleaning {
            self.cleaning = cleaning;
        }
        if let Some(settings) = settings {
            self.settings = settings;
        }
        match timestamp {
            Some(ts) => log::info!("restoring backup taken {}", ts),
            None => log::info!("restoring undated backup"),
        }
        self.save()
    }

    /// Parse a backup document and [`restore`](Self::restore) it. A document
    /// that does not parse leaves state untouched.
    pub fn restore_from_json(&mut self, text: &str) -> Result<(), StoreError> {
        let backup = Backup::from_json(text).map_err(|e| StoreError::InvalidBackup(e.to_string()))?;
        self.restore(backup)
    }
}
