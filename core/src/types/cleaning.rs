//! Cleaning Schedule — task lists keyed by period.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// The three checklist periods the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    /// The key this period is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            _ => Err(format!("unknown period: '{}' (expected daily, weekly or monthly)", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskImage {
    pub path: String,
    #[serde(default)]
    pub alt: String,
}

/// One checklist item. Only `completed` / `completed_at` change at runtime.
///
/// Fields the app does not interpret (including `images`) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        rename = "completedAt",
        serialize_with = "super::timestamp::option::serialize",
        deserialize_with = "super::timestamp::option::deserialize_lenient"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: &str, title: &str) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            completed: false,
            completed_at: None,
            extra: Map::new(),
        }
    }

    /// Reference images, skipping entries that are not `{path, alt}` objects.
    pub fn images(&self) -> Vec<TaskImage> {
        self.extra
            .get("images")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| TaskImage::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Flip completion, stamping or clearing the completion time.
    /// Returns the new `completed` value.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
        self.completed
    }

    pub fn clear_completion(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// Tasks for one period. Extra fields (titles, notes) are carried through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList {
            tasks,
            extra: Map::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Ids that occur more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) && !dups.contains(&task.id) {
                dups.push(task.id.clone());
            }
        }
        dups
    }
}

/// Task ids are compared as text; numeric and boolean ids are stringified.
fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "task id must be a string or number, got {}",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// CleaningSchedule
// ---------------------------------------------------------------------------

/// Task lists keyed by period name. Unknown period keys found in storage are
/// kept as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CleaningSchedule {
    periods: BTreeMap<String, TaskList>,
}

impl CleaningSchedule {
    pub fn new() -> Self {
        CleaningSchedule::default()
    }

    pub fn insert(&mut self, period: Period, list: TaskList) {
        self.periods.insert(period.as_str().to_string(), list);
    }

    pub fn get(&self, period: Period) -> Option<&TaskList> {
        self.periods.get(period.as_str())
    }

    pub fn get_mut(&mut self, period: Period) -> Option<&mut TaskList> {
        self.periods.get_mut(period.as_str())
    }

    pub fn tasks(&self, period: Period) -> &[Task] {
        self.get(period).map(|l| l.tasks.as_slice()).unwrap_or(&[])
    }

    pub fn find_task_mut(&mut self, period: Period, id: &str) -> Option<&mut Task> {
        self.get_mut(period).and_then(|l| l.find_mut(id))
    }

    /// Period keys present, in storage order.
    pub fn period_keys(&self) -> impl Iterator<Item = &str> {
        self.periods.keys().map(|k| k.as_str())
    }

    /// `(completed, total)` for a period; `(0, 0)` if absent.
    pub fn progress(&self, period: Period) -> (usize, usize) {
        match self.get(period) {
            Some(list) => (list.completed_count(), list.tasks.len()),
            None => (0, 0),
        }
    }
}
