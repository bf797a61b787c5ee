//! Typed read views over baseline content, for renderers.
//!
//! The store keeps menus and the service manual as JSON objects; these
//! structs are what a renderer deserializes an entry into. Every list field
//! defaults to empty so partial entries still render.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuEntry {
    pub name: String,
    pub warnings: Vec<String>,
    pub ingredients: Vec<String>,
    pub equipment: Vec<String>,
    pub allergens: Vec<String>,
    pub steps: Vec<Step>,
    pub troubleshooting: Vec<MenuTrouble>,
    pub quality_standards: Vec<String>,
    pub variations: Vec<String>,
    pub cleaning: Vec<String>,
    pub references: Vec<String>,
}

impl MenuEntry {
    pub fn from_value(value: &Value) -> Result<MenuEntry, serde_json::Error> {
        MenuEntry::deserialize(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Step {
    pub number: Option<u32>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MenuTrouble {
    pub problem: String,
    pub solution: String,
}

/// Shop-wide troubleshooting entry (not tied to one menu).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TroubleshootingItem {
    pub title: String,
    pub problem: String,
    pub solutions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HygieneGuide {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<HygieneSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HygieneSection {
    pub title: String,
    pub items: Vec<String>,
    pub subsections: Vec<HygieneSubsection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HygieneSubsection {
    pub subtitle: String,
    pub items: Vec<String>,
}

/// Payment terminal instructions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AirpayManual {
    pub title: String,
    pub device: String,
    pub methods: Vec<PaymentMethod>,
    pub videos: Vec<Video>,
    pub checklist: Vec<String>,
    pub cautions: Vec<String>,
    pub troubles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentMethod {
    pub name: String,
    pub steps: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub video_id: Option<String>,
    pub url: Option<String>,
}

impl Video {
    /// Link to open: the watch page for a known video id, else the raw url.
    pub fn link(&self) -> Option<String> {
        match (&self.video_id, &self.url) {
            (Some(id), _) => Some(format!("https://www.youtube.com/watch?v={}", id)),
            (None, Some(url)) => Some(url.clone()),
            (None, None) => None,
        }
    }
}
