//! Record reconciliation between shipped defaults and stored overrides.

pub mod merge;

pub use merge::{lookup, merge_record, FieldPath, MENU_PROTECTED_FIELDS, SERVICE_PROTECTED_FIELDS};
