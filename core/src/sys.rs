use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::baseline::Baseline;
use crate::clock::{format_timestamp, SystemClock};
use crate::command::{Command, Response};
use crate::config::{ensure_installed, AppConfig};
use crate::help::help_text;
use crate::storage::FileStorage;
use crate::store::{StateStore, StoreError, ToggleOutcome};
use crate::types::{HygieneGuide, MenuEntry, Period};

/// Entries shown by `history` when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;


/// Command runtime. Owns the state store and dispatches commands against it.
pub struct Sys {
    store: StateStore,
    backup_dir: PathBuf,
}


/// Install if needed, read `config.yaml`, and open the store over the
/// configured data directory.
pub fn open_store(config_dir: &Path) -> Result<(StateStore, AppConfig), String> {
    ensure_installed(config_dir).map_err(|e| e.to_string())?;
    let config = AppConfig::load(config_dir).map_err(|e| e.to_string())?;

    let baseline = match config.baseline_path(config_dir) {
        Some(path) => Baseline::from_path(&path),
        None => Baseline::bundled(),
    }
    .map_err(|e| e.to_string())?;

    let mut storage =
        FileStorage::open(&config.data_dir(config_dir)).map_err(|e| e.to_string())?;
    if let Some(bytes) = config.storage_quota_bytes {
        storage = storage.with_quota(bytes);
    }

    let store = StateStore::open(Box::new(storage), baseline, Box::new(SystemClock))
        .map_err(|e| format!("Failed to load records: {}", e))?;
    Ok((store, config))
}


impl Sys {
    /// Create a Sys from a config directory.
    pub fn new(config_dir: &Path) -> Result<Sys, String> {
        let (store, config) = open_store(config_dir)?;
        Ok(Sys::from_store(store, config.backup_dir(config_dir)))
    }

    /// Create a Sys around an already-open store. Useful for testing.
    pub fn from_store(store: StateStore, backup_dir: PathBuf) -> Sys {
        Sys { store, backup_dir }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn into_store(self) -> StateStore {
        self.store
    }

    /// Run one command.
    pub fn execute(&mut self, cmd: Command) -> Response {
        match cmd {
            Command::Status => self.cmd_status(),
            Command::Help { topic } => ok(help_text(topic.as_deref())),
            Command::Tui => Response::Error {
                message: "the tui is started by the cafem binary".into(),
            },
            Command::TaskList { period } => self.cmd_task_list(period),
            Command::TaskToggle { period, id } => self.cmd_task_toggle(period, id),
            Command::HistoryList { limit } => self.cmd_history(limit),
            Command::EditMode { enabled } => self.cmd_edit_mode(enabled),
            Command::CalendarShow => self.cmd_calendar_show(),
            Command::CalendarSet { markup } => self.cmd_calendar_set(markup),
            Command::CalendarClear => self.cmd_calendar_clear(),
            Command::BackupExport { dir } => self.cmd_backup(dir),
            Command::BackupRestore { path } => self.cmd_restore(path),
            Command::MenuList => self.cmd_menu_list(),
            Command::MenuShow { id } => self.cmd_menu_show(id),
            Command::ServiceShow { section } => self.cmd_service(section),
            Command::TroubleshootingList => self.cmd_troubleshooting(),
            Command::HygieneShow { audience } => self.cmd_hygiene(audience),
            Command::AirpayShow => self.cmd_airpay(),
        }
    }


    // -------------------------------------------------------------------
    // Checklist
    // -------------------------------------------------------------------

    fn cmd_status(&self) -> Response {
        let (done, total) = self.store.daily_progress();
        let mut out = format!("Daily checklist: {}/{} done\n", done, total);
        let _ = writeln!(
            out,
            "Edit mode: {}",
            if self.store.settings().edit_mode { "on" } else { "off" }
        );
        match self.store.history().latest() {
            Some(entry) => {
                let _ = write!(
                    out,
                    "Last update: {} ({})",
                    entry.message,
                    format_timestamp(&entry.timestamp)
                );
            }
            None => out.push_str("Last update: none"),
        }
        ok(out)
    }

    fn cmd_task_list(&self, period: Option<String>) -> Response {
        let periods = match period {
            Some(p) => match p.parse::<Period>() {
                Ok(p) => vec![p],
                Err(e) => return err(e),
            },
            None => Period::ALL.to_vec(),
        };
        let blocks: Vec<String> = periods.iter().map(|p| self.format_period(*p)).collect();
        ok(blocks.join("\n\n"))
    }

    fn format_period(&self, period: Period) -> String {
        let Some(list) = self.store.cleaning().get(period) else {
            return format!("{}: (no tasks)", period.label());
        };
        let heading = list
            .extra
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(period.label());
        let (done, total) = self.store.cleaning().progress(period);
        let mut out = format!("{} ({}/{})", heading, done, total);
        for task in &list.tasks {
            let mark = if task.completed { "x" } else { " " };
            let _ = write!(out, "\n  [{}] {:<12} {}", mark, task.id, task.title);
            if let Some(at) = &task.completed_at {
                let _ = write!(out, "  (done {})", format_timestamp(at));
            }
        }
        out
    }

    fn cmd_task_toggle(&mut self, period: String, id: String) -> Response {
        let period = match period.parse::<Period>() {
            Ok(p) => p,
            Err(e) => return err(e),
        };
        match self.store.toggle_task_completion(&id, period) {
            Ok(ToggleOutcome::Completed(at)) => {
                ok(format!("Completed {} at {}", id, format_timestamp(&at)))
            }
            Ok(ToggleOutcome::Reopened) => ok(format!("Reopened {}", id)),
            Ok(ToggleOutcome::NotFound) => err(format!("No {} task with id '{}'", period, id)),
            Err(e) => store_err(e),
        }
    }

    fn cmd_history(&self, limit: Option<usize>) -> Response {
        let entries = self
            .store
            .recent_history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT));
        if entries.is_empty() {
            return ok("No updates yet".into());
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| format!("{}  {}", format_timestamp(&e.timestamp), e.message))
            .collect();
        ok(lines.join("\n"))
    }

    fn cmd_edit_mode(&mut self, enabled: bool) -> Response {
        match self.store.set_edit_mode(enabled) {
            Ok(()) => ok(format!("Edit mode {}", if enabled { "on" } else { "off" })),
            Err(e) => store_err(e),
        }
    }


    // -------------------------------------------------------------------
    // Calendar
    // -------------------------------------------------------------------

    fn cmd_calendar_show(&self) -> Response {
        let custom = match self.store.calendar_embed() {
            Ok(embed) => embed.is_some(),
            Err(e) => return store_err(e),
        };
        match self.store.calendar_frame_src() {
            Ok(Some(src)) if custom => ok(format!("custom: {}", src)),
            Ok(Some(src)) => ok(format!("default: {}", src)),
            Ok(None) => err(
                "Stored calendar embed has no frame URL. Run 'cafem calendar set' again.".into(),
            ),
            Err(e) => store_err(e),
        }
    }

    fn cmd_calendar_set(&mut self, markup: String) -> Response {
        match self.store.set_calendar_embed(Some(&markup)) {
            Ok(()) => ok("Calendar settings updated".into()),
            Err(e) => store_err(e),
        }
    }

    fn cmd_calendar_clear(&mut self) -> Response {
        match self.store.clear_calendar_embed() {
            Ok(()) => ok("Calendar settings removed".into()),
            Err(e) => store_err(e),
        }
    }


    // -------------------------------------------------------------------
    // Backup
    // -------------------------------------------------------------------

    fn cmd_backup(&self, dir: Option<String>) -> Response {
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| self.backup_dir.clone());
        match self.store.write_backup(&dir) {
            Ok(path) => ok(format!("Backup written to {}", path.display())),
            Err(e) => store_err(e),
        }
    }

    fn cmd_restore(&mut self, path: String) -> Response {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => return err(format!("cannot read {}: {}", path, e)),
        };
        match self.store.restore_from_json(&text) {
            Ok(()) => ok(format!("Restored from {}", path)),
            Err(e) => store_err(e),
        }
    }


    // -------------------------------------------------------------------
    // Reference content
    // -------------------------------------------------------------------

    fn cmd_menu_list(&self) -> Response {
        let lines: Vec<String> = self
            .store
            .menu()
            .iter()
            .map(|(id, value)| {
                let name = value.get("name").and_then(|n| n.as_str()).unwrap_or("");
                format!("{:<14} {}", id, name)
            })
            .collect();
        ok(lines.join("\n"))
    }

    fn cmd_menu_show(&self, id: String) -> Response {
        match self.store.menu_entry(&id) {
            Some(Ok(entry)) => ok(format_menu(&entry)),
            Some(Err(e)) => err(format!("menu '{}' is malformed: {}", id, e)),
            None => err(format!("Unknown menu: '{}'", id)),
        }
    }

    fn cmd_service(&self, section: Option<String>) -> Response {
        let service = self.store.service();
        match section {
            None => {
                let lines: Vec<String> = service
                    .iter()
                    .map(|(key, value)| {
                        let title = value.get("title").and_then(|t| t.as_str()).unwrap_or("");
                        format!("{:<16} {}", key, title)
                    })
                    .collect();
                ok(lines.join("\n"))
            }
            Some(name) => match service.get(&name) {
                Some(value) => match serde_yaml::to_string(value) {
                    Ok(text) => ok(text.trim_end().to_string()),
                    Err(e) => err(format!("cannot render section '{}': {}", name, e)),
                },
                None => err(format!("Unknown service section: '{}'", name)),
            },
        }
    }

    fn cmd_troubleshooting(&self) -> Response {
        let blocks: Vec<String> = self
            .store
            .baseline()
            .troubleshooting
            .iter()
            .map(|item| {
                let mut out = format!("{}\n  Problem: {}", item.title, item.problem);
                for s in &item.solutions {
                    let _ = write!(out, "\n  - {}", s);
                }
                out
            })
            .collect();
        ok(blocks.join("\n\n"))
    }

    fn cmd_hygiene(&self, audience: Option<String>) -> Response {
        let hygiene = &self.store.baseline().hygiene;
        match audience.as_deref() {
            None | Some("staff") => ok(format_hygiene(&hygiene.staff)),
            Some("manager") => ok(format_hygiene(&hygiene.manager)),
            Some(other) => err(format!("Unknown hygiene audience: '{}'", other)),
        }
    }

    fn cmd_airpay(&self) -> Response {
        let manual = &self.store.baseline().airpay;
        let mut out = format!("{}\nDevice: {}", manual.title, manual.device);
        for method in &manual.methods {
            let _ = write!(out, "\n\n{}", method.name);
            for (i, step) in method.steps.iter().enumerate() {
                let _ = write!(out, "\n  {}. {}", i + 1, step);
            }
            for note in &method.notes {
                let _ = write!(out, "\n  Note: {}", note);
            }
        }
        push_list(&mut out, "Checklist", &manual.checklist);
        push_list(&mut out, "Cautions", &manual.cautions);
        push_list(&mut out, "Troubles", &manual.troubles);
        if !manual.videos.is_empty() {
            out.push_str("\n\nVideos:");
            for video in &manual.videos {
                match video.link() {
                    Some(link) => {
                        let _ = write!(out, "\n  {}: {}", video.title, link);
                    }
                    None => {
                        let _ = write!(out, "\n  {}", video.title);
                    }
                }
            }
        }
        ok(out)
    }
}


// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn ok(output: String) -> Response {
    Response::Ok { output }
}

fn err(message: String) -> Response {
    Response::Error { message }
}

fn store_err(e: StoreError) -> Response {
    log::debug!("command failed: {:?}", e);
    Response::Error {
        message: e.to_string(),
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n\n{}:", heading);
    for item in items {
        let _ = write!(out, "\n  - {}", item);
    }
}

fn format_menu(entry: &MenuEntry) -> String {
    let mut out = entry.name.clone();
    push_list(&mut out, "Warnings", &entry.warnings);
    push_list(&mut out, "Ingredients", &entry.ingredients);
    push_list(&mut out, "Equipment", &entry.equipment);
    push_list(&mut out, "Allergens", &entry.allergens);
    if !entry.steps.is_empty() {
        out.push_str("\n\nSteps:");
        for (i, step) in entry.steps.iter().enumerate() {
            let number = step.number.unwrap_or(i as u32 + 1);
            let _ = write!(out, "\n  {}. {}", number, step.title);
            if !step.description.is_empty() {
                let _ = write!(out, ": {}", step.description);
            }
            for tip in &step.tips {
                let _ = write!(out, "\n     tip: {}", tip);
            }
        }
    }
    if !entry.troubleshooting.is_empty() {
        out.push_str("\n\nTroubleshooting:");
        for t in &entry.troubleshooting {
            let _ = write!(out, "\n  - {} -> {}", t.problem, t.solution);
        }
    }
    push_list(&mut out, "Quality standards", &entry.quality_standards);
    push_list(&mut out, "Variations", &entry.variations);
    push_list(&mut out, "Cleaning", &entry.cleaning);
    push_list(&mut out, "References", &entry.references);
    out
}

fn format_hygiene(guide: &HygieneGuide) -> String {
    let mut out = guide.title.clone();
    if !guide.subtitle.is_empty() {
        let _ = write!(out, "\n{}", guide.subtitle);
    }
    if let Some(desc) = &guide.description {
        let _ = write!(out, "\n\n{}", desc);
    }
    for section in &guide.sections {
        push_list(&mut out, &section.title, &section.items);
        if section.items.is_empty() {
            let _ = write!(out, "\n\n{}:", section.title);
        }
        for sub in &section.subsections {
            let _ = write!(out, "\n  {}", sub.subtitle);
            for item in &sub.items {
                let _ = write!(out, "\n    - {}", item);
            }
        }
    }
    out
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
