//! Persisted record types.
//!
//! Menu Catalog and Service Manual stay as JSON objects (their shape is
//! owned by the baseline dataset and they are merged field-by-field); the
//! Cleaning Schedule, Settings, Update History and Backup are typed.

pub mod backup;
pub mod cleaning;
pub mod content;
pub mod history;
pub mod settings;

pub use backup::{backup_file_name, Backup};
pub use cleaning::{CleaningSchedule, Period, Task, TaskImage, TaskList};
pub use content::{
    AirpayManual, HygieneGuide, HygieneSection, MenuEntry, MenuTrouble, PaymentMethod, Step,
    TroubleshootingItem, Video,
};
pub use history::{UpdateEntry, UpdateHistory, HISTORY_LIMIT};
pub use settings::Settings;

use serde_json::{Map, Value};

/// Mapping from menu identifier to a menu entry object.
pub type MenuCatalog = Map<String, Value>;

/// Named service-manual sections (customerService, layout, hours, ...).
pub type ServiceManual = Map<String, Value>;

/// Serde helpers storing `DateTime<Utc>` as millisecond RFC 3339 text.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::clock::format_timestamp;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(d)?;
        parse(&text).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        use crate::clock::format_timestamp;

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => s.serialize_str(&format_timestamp(ts)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(text) => super::parse(&text)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }

        /// Like [`deserialize`], but text that is not RFC 3339 reads as
        /// `None` instead of failing the surrounding record.
        pub fn deserialize_lenient<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(text) => match super::parse(&text) {
                    Ok(ts) => Ok(Some(ts)),
                    Err(e) => {
                        log::warn!("ignoring unreadable timestamp '{}': {}", text, e);
                        Ok(None)
                    }
                },
                None => Ok(None),
            }
        }
    }
}
