//! State Store — owns the four persisted records plus the update history.
//!
//! Constructed once via [`StateStore::load`] (or [`StateStore::open`], which
//! also runs the daily checklist reset) and handed by reference to whatever
//! renders it. Every mutating entry point persists before returning.
//!
//! | Record | Load behaviour |
//! |--------|----------------|
//! | Menu Catalog | baseline merged with stored overrides, written back |
//! | Service Manual | same, with protected image fields forced to baseline |
//! | Cleaning Schedule | stored value verbatim, else baseline |
//! | Settings | stored value verbatim, else defaults |
//!
//! Stored task lists carry completion state and fully replace the defaults;
//! tasks added to a newer baseline do not appear until a backup restore or
//! a storage reset.

pub mod backup;
pub mod calendar;
pub mod checklist;
pub mod history;

pub use calendar::{extract_frame_src, validate_embed, DEFAULT_CALENDAR_SRC};
pub use checklist::ToggleOutcome;
pub use history::{CALENDAR_REMOVED_MESSAGE, CALENDAR_UPDATED_MESSAGE, SAVE_MESSAGE};

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::baseline::{Baseline, BaselineError};
use crate::clock::Clock;
use crate::data::merge::{merge_record, MENU_PROTECTED_FIELDS, SERVICE_PROTECTED_FIELDS};
use crate::storage::{
    KeyValueStorage, StorageError, CLEANING_DATA_KEY, MENU_DATA_KEY, SERVICE_DATA_KEY,
    SETTINGS_KEY, UPDATE_HISTORY_KEY,
};
use crate::types::{
    CleaningSchedule, MenuCatalog, MenuEntry, ServiceManual, Settings, UpdateEntry,
    UpdateHistory,
};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// The storage backend failed to read or write.
    Storage(StorageError),
    /// A record could not be serialized.
    Serialize(serde_json::Error),
    /// Calendar markup failed the frame-tag check.
    InvalidEmbed(String),
    /// A backup document could not be parsed.
    InvalidBackup(String),
    /// Backup file I/O.
    Io(std::io::Error),
    /// The baseline dataset could not be loaded.
    Baseline(BaselineError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(e) => write!(f, "{}", e),
            StoreError::Serialize(e) => write!(f, "serialization failed: {}", e),
            StoreError::InvalidEmbed(msg) => write!(f, "invalid calendar embed: {}", msg),
            StoreError::InvalidBackup(msg) => write!(f, "invalid backup: {}", msg),
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Baseline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::Storage(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

impl From<BaselineError> for StoreError {
    fn from(e: BaselineError) -> Self {
        StoreError::Baseline(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

pub struct StateStore {
    storage: Box<dyn KeyValueStorage>,
    clock: Box<dyn Clock>,
    baseline: Baseline,
    menu: MenuCatalog,
    cleaning: CleaningSchedule,
    service: ServiceManual,
    settings: Settings,
    history: UpdateHistory,
}

impl StateStore {
    /// Load every record from storage, reconciling against `baseline`.
    ///
    /// Stored values that fail to parse are treated as absent. Menu Catalog
    /// and Service Manual are written back in merged form whenever a stored
    /// value existed.
    pub fn load(
        mut storage: Box<dyn KeyValueStorage>,
        baseline: Baseline,
        clock: Box<dyn Clock>,
    ) -> Result<StateStore, StoreError> {
        let menu = match read_json::<MenuCatalog>(storage.as_ref(), MENU_DATA_KEY)? {
            Some(stored) => {
                let merged = merge_record(&baseline.menu, &stored, MENU_PROTECTED_FIELDS);
                write_json(storage.as_mut(), MENU_DATA_KEY, &merged)?;
                merged
            }
            None => baseline.menu.clone(),
        };

        let service = match read_json::<ServiceManual>(storage.as_ref(), SERVICE_DATA_KEY)? {
            Some(stored) => {
                let merged =
                    merge_record(&baseline.service, &stored, SERVICE_PROTECTED_FIELDS);
                write_json(storage.as_mut(), SERVICE_DATA_KEY, &merged)?;
                merged
            }
            None => baseline.service.clone(),
        };

        let cleaning = read_json::<CleaningSchedule>(storage.as_ref(), CLEANING_DATA_KEY)?
            .unwrap_or_else(|| baseline.cleaning.clone());

        let settings = read_json::<Settings>(storage.as_ref(), SETTINGS_KEY)?.unwrap_or_default();

        let history = read_json::<Vec<Value>>(storage.as_ref(), UPDATE_HISTORY_KEY)?
            .map(|raw| UpdateHistory::from_entries(readable_entries(raw)))
            .unwrap_or_default();

        log::debug!(
            "loaded {} menus, {} service sections, {} history entries",
            menu.len(),
            service.len(),
            history.len()
        );

        Ok(StateStore {
            storage,
            clock,
            baseline,
            menu,
            cleaning,
            service,
            settings,
            history,
        })
    }

    /// Startup sequence: [`load`](Self::load) then
    /// [`reset_daily_checklist`](Self::reset_daily_checklist).
    pub fn open(
        storage: Box<dyn KeyValueStorage>,
        baseline: Baseline,
        clock: Box<dyn Clock>,
    ) -> Result<StateStore, StoreError> {
        let mut store = StateStore::load(storage, baseline, clock)?;
        store.reset_daily_checklist()?;
        Ok(store)
    }

    /// Persist the four records and log a "Data saved" history entry.
    ///
    /// A failed write is returned as-is; records already written stay
    /// written.
    pub fn save(&mut self) -> Result<(), StoreError> {
        write_json(self.storage.as_mut(), MENU_DATA_KEY, &self.menu)?;
        write_json(self.storage.as_mut(), CLEANING_DATA_KEY, &self.cleaning)?;
        write_json(self.storage.as_mut(), SERVICE_DATA_KEY, &self.service)?;
        write_json(self.storage.as_mut(), SETTINGS_KEY, &self.settings)?;
        self.record_history(SAVE_MESSAGE)
    }

    /// Settings change from the UI.
    pub fn set_edit_mode(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.settings.edit_mode = enabled;
        self.save()
    }

    // -------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------

    pub fn menu(&self) -> &MenuCatalog {
        &self.menu
    }

    /// Typed view of one menu. `None` if the id is unknown.
    pub fn menu_entry(&self, id: &str) -> Option<Result<MenuEntry, serde_json::Error>> {
        self.menu.get(id).map(MenuEntry::from_value)
    }

    pub fn cleaning(&self) -> &CleaningSchedule {
        &self.cleaning
    }

    pub fn service(&self) -> &ServiceManual {
        &self.service
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &UpdateHistory {
        &self.history
    }

    /// Shipped defaults plus the read-only reference content
    /// (troubleshooting, hygiene, payment terminal).
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Give the storage back, e.g. to reopen it.
    pub fn into_storage(self) -> Box<dyn KeyValueStorage> {
        self.storage
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Read and parse a JSON record. Parse failures are logged and reported as
/// absent; storage failures propagate.
fn read_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(text) = storage.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("stored '{}' is corrupt ({}); using defaults", key, e);
            Ok(None)
        }
    }
}

/// Keep the history entries that parse; log and skip the rest.
fn readable_entries(raw: Vec<Value>) -> Vec<UpdateEntry> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("dropping unreadable history entry {}: {}", i, e);
                None
            }
        })
        .collect()
}

fn write_json<T: Serialize + ?Sized>(
    storage: &mut dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let text = serde_json::to_string(value)?;
    storage.set(key, &text)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use std::rc::Rc;

    use serde_json::{json, Map, Value};

    use super::StateStore;
    use crate::baseline::{Baseline, BaselineError};
    use crate::clock::FixedClock;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::types::{CleaningSchedule, Period, Task, TaskList};

    pub fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("expected object, got {}", other),
        }
    }

    pub fn baseline() -> Baseline {
        let menu = obj(json!({
            "latte": {"name": "Latte", "ingredients": ["espresso", "milk"], "allergens": ["Milk"]},
            "mocha": {"name": "Mocha", "ingredients": ["espresso", "chocolate", "milk"]}
        }));
        let service = obj(json!({
            "layout": {"title": "Layout", "image": "img/layout-v2.png"},
            "hours": {
                "title": "Hours",
                "normal": {"label": "Weekdays", "image": "img/normal-v2.png"},
                "holiday": {"label": "Holidays", "image": "img/holiday-v2.png"}
            },
            "staffing": {"title": "Staffing", "image": "img/staff-v2.png"},
            "overview": {"title": "Overview", "content": ["Counter service"]}
        }));
        let mut cleaning = CleaningSchedule::new();
        cleaning.insert(
            Period::Daily,
            TaskList::new(vec![
                Task::new("d1", "Wipe tables"),
                Task::new("d2", "Mop floor"),
                Task::new("d3", "Empty trash"),
            ]),
        );
        cleaning.insert(Period::Weekly, TaskList::new(vec![Task::new("w1", "Fridge")]));
        cleaning.insert(Period::Monthly, TaskList::new(vec![Task::new("m1", "Filters")]));
        Baseline::new(menu, cleaning, service)
    }

    pub fn clock() -> Rc<FixedClock> {
        Rc::new(FixedClock::at("2026-04-10T09:00:00Z").unwrap())
    }

    /// Load a store over `storage` with the fixture baseline and a shared clock.
    pub fn store_with(storage: MemoryStorage, clock: &Rc<FixedClock>) -> StateStore {
        StateStore::load(Box::new(storage), baseline(), Box::new(clock.clone())).unwrap()
    }

    pub fn empty_store() -> (StateStore, Rc<FixedClock>) {
        let clock = clock();
        (store_with(MemoryStorage::new(), &clock), clock)
    }

    pub fn stored(store: &StateStore, key: &str) -> Option<Value> {
        store
            .storage()
            .get(key)
            .unwrap()
            .map(|text| serde_json::from_str(&text).unwrap())
    }

    pub fn raw(storage: &dyn KeyValueStorage, key: &str) -> Option<String> {
        storage.get(key).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::Period;
    use serde_json::json;

    #[test]
    fn load_without_storage_equals_baseline() {
        let (store, _) = empty_store();
        let base = baseline();
        assert_eq!(store.menu(), &base.menu);
        assert_eq!(store.service(), &base.service);
        assert_eq!(store.cleaning(), &base.cleaning);
        assert_eq!(store.settings(), &Settings::default());
        assert!(store.history().is_empty());
    }

    #[test]
    fn load_without_storage_writes_nothing() {
        let (store, _) = empty_store();
        assert!(raw(store.storage(), MENU_DATA_KEY).is_none());
        assert!(raw(store.storage(), SERVICE_DATA_KEY).is_none());
    }

    #[test]
    fn load_merges_stored_menu_and_writes_back() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                MENU_DATA_KEY,
                r#"{"latte": {"ingredients": ["espresso", "oat milk"]}, "retired": {"name": "Old"}}"#,
            )
            .unwrap();
        let store = store_with(storage, &clock());
        assert_eq!(store.menu()["latte"]["ingredients"], json!(["espresso", "oat milk"]));
        assert_eq!(store.menu()["latte"]["allergens"], json!(["Milk"]));
        assert_eq!(store.menu()["mocha"], baseline().menu["mocha"]);
        assert!(store.menu().get("retired").is_none());

        let persisted = stored(&store, MENU_DATA_KEY).unwrap();
        assert_eq!(persisted, serde_json::Value::Object(store.menu().clone()));
    }

    #[test]
    fn load_forces_protected_service_images() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                SERVICE_DATA_KEY,
                &json!({
                    "layout": {"title": "Our floor", "image": "img/layout-v1.png"},
                    "hours": {"normal": {"label": "Mon-Fri", "image": "img/old.png"}},
                    "staffing": {"image": "img/old-staff.png"}
                })
                .to_string(),
            )
            .unwrap();
        let store = store_with(storage, &clock());
        let service = store.service();
        assert_eq!(service["layout"]["title"], json!("Our floor"));
        assert_eq!(service["layout"]["image"], json!("img/layout-v2.png"));
        assert_eq!(service["hours"]["normal"]["label"], json!("Mon-Fri"));
        assert_eq!(service["hours"]["normal"]["image"], json!("img/normal-v2.png"));
        assert_eq!(service["hours"]["holiday"]["image"], json!("img/holiday-v2.png"));
        assert_eq!(service["staffing"]["image"], json!("img/staff-v2.png"));
        assert_eq!(service["overview"], baseline().service["overview"]);
    }

    #[test]
    fn stored_cleaning_replaces_baseline_wholesale() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                CLEANING_DATA_KEY,
                r#"{"daily": {"tasks": [{"id": "custom", "title": "Custom"}]}}"#,
            )
            .unwrap();
        let store = store_with(storage, &clock());
        let ids: Vec<&str> = store
            .cleaning()
            .tasks(Period::Daily)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["custom"]);
        assert!(store.cleaning().get(Period::Weekly).is_none());
    }

    #[test]
    fn stored_cleaning_keeps_unrecognized_fields_through_save() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                CLEANING_DATA_KEY,
                &json!({"daily": {"tasks": [
                    {"id": "a", "title": "A", "image": "img/legacy.png", "priority": 2,
                     "completed": true},
                    {"id": 2, "completed": false}
                ]}})
                .to_string(),
            )
            .unwrap();
        let mut store = store_with(storage, &clock());
        let ids: Vec<&str> = store
            .cleaning()
            .tasks(Period::Daily)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "2"]);

        store.save().unwrap();
        let persisted = stored(&store, CLEANING_DATA_KEY).unwrap();
        let first = &persisted["daily"]["tasks"][0];
        assert_eq!(first["image"], json!("img/legacy.png"));
        assert_eq!(first["priority"], json!(2));
        assert_eq!(first["completed"], json!(true));
        assert_eq!(persisted["daily"]["tasks"][1]["title"], json!(""));
    }

    #[test]
    fn stored_settings_used_verbatim() {
        let mut storage = MemoryStorage::new();
        storage.set(SETTINGS_KEY, r#"{"editMode": true}"#).unwrap();
        let store = store_with(storage, &clock());
        assert!(store.settings().edit_mode);
    }

    #[test]
    fn corrupt_records_fall_back_to_baseline() {
        let mut storage = MemoryStorage::new();
        for key in [
            MENU_DATA_KEY,
            SERVICE_DATA_KEY,
            CLEANING_DATA_KEY,
            SETTINGS_KEY,
            UPDATE_HISTORY_KEY,
        ] {
            storage.set(key, "{not json").unwrap();
        }
        let store = store_with(storage, &clock());
        let base = baseline();
        assert_eq!(store.menu(), &base.menu);
        assert_eq!(store.service(), &base.service);
        assert_eq!(store.cleaning(), &base.cleaning);
        assert_eq!(store.settings(), &Settings::default());
        assert!(store.history().is_empty());
    }

    #[test]
    fn load_twice_is_stable() {
        let mut storage = MemoryStorage::new();
        storage
            .set(MENU_DATA_KEY, r#"{"latte": {"name": "House latte"}}"#)
            .unwrap();
        storage
            .set(SERVICE_DATA_KEY, r#"{"layout": {"image": "x.png", "title": "Floor"}}"#)
            .unwrap();
        let clock = clock();
        let first = store_with(storage, &clock);
        let (menu, service, cleaning, settings) = (
            first.menu().clone(),
            first.service().clone(),
            first.cleaning().clone(),
            first.settings().clone(),
        );
        let second = StateStore::load(first.into_storage(), baseline(), Box::new(clock)).unwrap();
        assert_eq!(second.menu(), &menu);
        assert_eq!(second.service(), &service);
        assert_eq!(second.cleaning(), &cleaning);
        assert_eq!(second.settings(), &settings);
    }

    #[test]
    fn save_persists_all_records_and_logs() {
        let (mut store, _) = empty_store();
        store.save().unwrap();
        assert_eq!(
            stored(&store, MENU_DATA_KEY).unwrap(),
            serde_json::Value::Object(baseline().menu)
        );
        assert!(stored(&store, CLEANING_DATA_KEY).is_some());
        assert!(stored(&store, SERVICE_DATA_KEY).is_some());
        assert_eq!(stored(&store, SETTINGS_KEY).unwrap(), json!({"editMode": false}));
        let history = stored(&store, UPDATE_HISTORY_KEY).unwrap();
        assert_eq!(history[0]["message"], json!(SAVE_MESSAGE));
        assert_eq!(history[0]["timestamp"], json!("2026-04-10T09:00:00.000Z"));
    }

    #[test]
    fn save_failure_propagates() {
        let clock = clock();
        let mut store = store_with(MemoryStorage::with_quota(64), &clock);
        let err = store.save().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert!(store.history().is_empty());
    }

    #[test]
    fn edit_mode_persists() {
        let (mut store, clock) = empty_store();
        store.set_edit_mode(true).unwrap();
        let reopened =
            StateStore::load(store.into_storage(), baseline(), Box::new(clock)).unwrap();
        assert!(reopened.settings().edit_mode);
        assert_eq!(reopened.history().latest().unwrap().message, SAVE_MESSAGE);
    }

    #[test]
    fn menu_entry_typed_view() {
        let (store, _) = empty_store();
        let entry = store.menu_entry("mocha").unwrap().unwrap();
        assert_eq!(entry.name, "Mocha");
        assert_eq!(entry.ingredients.len(), 3);
        assert!(store.menu_entry("frappe").is_none());
    }
}
