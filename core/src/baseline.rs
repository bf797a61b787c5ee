//! Baseline Dataset — the shipped default content.
//!
//! Bundled into the binary from `data/baseline.json`; a deployment may point
//! `baseline_path` at a newer file instead. The store never mutates a
//! `Baseline`; it clones what it needs.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::{
    AirpayManual, CleaningSchedule, HygieneGuide, MenuCatalog, Period, ServiceManual,
    TroubleshootingItem,
};

const BUNDLED: &str = include_str!("../data/baseline.json");

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Baseline {
    pub menu: MenuCatalog,
    pub cleaning: CleaningSchedule,
    pub service: ServiceManual,
    #[serde(default)]
    pub troubleshooting: Vec<TroubleshootingItem>,
    #[serde(default)]
    pub hygiene: Hygiene,
    #[serde(default)]
    pub airpay: AirpayManual,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Hygiene {
    #[serde(default)]
    pub staff: HygieneGuide,
    #[serde(default)]
    pub manager: HygieneGuide,
}

#[derive(Debug)]
pub enum BaselineError {
    Io(PathBuf, std::io::Error),
    Parse(String),
}

impl fmt::Display for BaselineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselineError::Io(path, e) => {
                write!(f, "cannot read baseline {}: {}", path.display(), e)
            }
            BaselineError::Parse(msg) => write!(f, "invalid baseline dataset: {}", msg),
        }
    }
}

impl std::error::Error for BaselineError {}

impl Baseline {
    /// The dataset compiled into this build.
    pub fn bundled() -> Result<Baseline, BaselineError> {
        Baseline::from_json(BUNDLED)
    }

    pub fn from_path(path: &Path) -> Result<Baseline, BaselineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BaselineError::Io(path.to_path_buf(), e))?;
        Baseline::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Baseline, BaselineError> {
        let baseline: Baseline =
            serde_json::from_str(text).map_err(|e| BaselineError::Parse(e.to_string()))?;
        baseline.validate()?;
        Ok(baseline)
    }

    /// Minimal baseline for tests and embedding: the given records, no
    /// reference content.
    pub fn new(menu: MenuCatalog, cleaning: CleaningSchedule, service: ServiceManual) -> Self {
        Baseline {
            menu,
            cleaning,
            service,
            troubleshooting: Vec::new(),
            hygiene: Hygiene::default(),
            airpay: AirpayManual::default(),
        }
    }

    /// Task ids must be unique within each period.
    fn validate(&self) -> Result<(), BaselineError> {
        for period in Period::ALL {
            if let Some(list) = self.cleaning.get(period) {
                let dups = list.duplicate_ids();
                if !dups.is_empty() {
                    return Err(BaselineError::Parse(format!(
                        "duplicate task ids in {}: {}",
                        period,
                        dups.join(", ")
                    )));
                }
            }
        }
        if let Some((key, _)) = self.menu.iter().find(|(_, v)| !v.is_object()) {
            return Err(BaselineError::Parse(format!(
                "menu entry '{}' is not an object",
                key
            )));
        }
        Ok(())
    }

    /// One service-manual section, if the baseline ships it.
    pub fn service_section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.service.get(name).and_then(|v| v.as_object())
    }
}
