//! Baseline/stored reconciliation for keyed JSON records.
//!
//! The result has exactly the baseline's top-level keys. For each key the
//! baseline entry is the starting point and the stored entry's fields are
//! laid over it (one level deep). Protected paths are then forced back to
//! the baseline value, so app-controlled assets never take a stored override.

use serde_json::{Map, Value};

/// A dotted path into a merged record, e.g. `["hours", "normal", "image"]`.
pub type FieldPath = &'static [&'static str];

/// Service-manual fields that always come from the baseline.
pub const SERVICE_PROTECTED_FIELDS: &[FieldPath] = &[
    &["layout", "image"],
    &["hours", "normal", "image"],
    &["hours", "holiday", "image"],
    &["staffing", "image"],
];

/// Menu entries have no protected fields.
pub const MENU_PROTECTED_FIELDS: &[FieldPath] = &[];

/// Merge `stored` onto `baseline`. Neither input is modified.
///
/// - Keys only in `stored` are dropped.
/// - Keys only in `baseline` are copied.
/// - When both entries are objects, stored fields win field-by-field.
/// - A null, `false`, zero or empty-string stored entry keeps the baseline.
/// - Otherwise the stored value replaces the baseline value.
/// - Protected paths the baseline lacks keep whatever was stored.
pub fn merge_record(
    baseline: &Map<String, Value>,
    stored: &Map<String, Value>,
    protected: &[FieldPath],
) -> Map<String, Value> {
    let mut merged = Map::new();
    for (key, base_value) in baseline {
        let value = match stored.get(key) {
            None => base_value.clone(),
            Some(stored_value) => overlay(base_value, stored_value),
        };
        merged.insert(key.clone(), value);
    }
    for path in protected {
        enforce_baseline(&mut merged, baseline, path);
    }
    merged
}

fn overlay(base: &Value, stored: &Value) -> Value {
    match (base, stored) {
        (Value::Object(b), Value::Object(s)) => {
            let mut out = b.clone();
            for (field, v) in s {
                out.insert(field.clone(), v.clone());
            }
            Value::Object(out)
        }
        (b, s) if is_empty_override(s) => b.clone(),
        (_, s) => s.clone(),
    }
}

/// Null, `false`, zero and the empty string carry no override.
fn is_empty_override(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Read the value at `path`, if every step is an object containing it.
pub fn lookup<'a>(record: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = record.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Make `merged` hold the baseline's value at `path`. A path the baseline
/// lacks is left as stored. Intermediate objects are created when the stored
/// data dropped them; a non-object in the way is replaced.
fn enforce_baseline(merged: &mut Map<String, Value>, baseline: &Map<String, Value>, path: &[&str]) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };
    let Some(base_value) = lookup(baseline, path) else {
        return;
    };
    if let Some(parent) = parents_mut(merged, parents) {
        parent.insert((*leaf).to_string(), base_value.clone());
    }
}

fn parents_mut<'a>(
    record: &'a mut Map<String, Value>,
    parents: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    let mut current = record;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = slot.as_object_mut()?;
    }
    Some(current)
}
