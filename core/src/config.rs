//! Application configuration and first-run install.
//!
//! `config.yaml` lives in the config directory. Every field is optional;
//! relative paths resolve against the config directory.
//!
//! ```yaml
//! data_dir: data
//! backup_dir: backups
//! baseline_path: baseline.json
//! storage_quota_bytes: 5242880
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.yaml";

/// Written on first run. Existing files are never touched.
const DEFAULT_CONFIG: &str = "\
# cafe-manual configuration
# Paths are relative to this directory unless absolute.

# Where records are stored, one file per key.
data_dir: data

# Default destination for `cafem backup`.
backup_dir: backups

# Replace the bundled menus, checklists and service manual.
# baseline_path: baseline.json

# Refuse writes once stored records exceed this many bytes.
# storage_quota_bytes: 5242880
";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot access {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "invalid {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub baseline_path: Option<PathBuf>,
    pub storage_quota_bytes: Option<usize>,
}

impl AppConfig {
    pub fn parse(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
        let blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Load `config.yaml` from `config_dir`; defaults if the file is absent.
    pub fn load(config_dir: &Path) -> Result<AppConfig, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => AppConfig::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
            Err(e) => Err(ConfigError::Io(path, e)),
        }
    }

    pub fn data_dir(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, self.data_dir.as_deref(), "data")
    }

    pub fn backup_dir(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, self.backup_dir.as_deref(), "backups")
    }

    /// Override for the bundled baseline, if configured.
    pub fn baseline_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.baseline_path
            .as_deref()
            .map(|p| resolve(config_dir, Some(p), ""))
    }
}

fn resolve(config_dir: &Path, configured: Option<&Path>, default: &str) -> PathBuf {
    match configured {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => config_dir.join(p),
        None => config_dir.join(default),
    }
}

// ---------------------------------------------------------------------------
// Install
// ---------------------------------------------------------------------------

/// Result of an installation check.
#[derive(Debug, PartialEq)]
pub enum InstallStatus {
    /// Config already present.
    Current,
    /// Fresh install was performed.
    Installed,
}

/// Create the config directory layout and write a default `config.yaml` if
/// none exists. Never overwrites.
pub fn ensure_installed(config_dir: &Path) -> Result<InstallStatus, ConfigError> {
    let path = config_dir.join(CONFIG_FILE);
    let status = if path.exists() {
        InstallStatus::Current
    } else {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| ConfigError::Io(config_dir.to_path_buf(), e))?;
        std::fs::write(&path, DEFAULT_CONFIG).map_err(|e| ConfigError::Io(path.clone(), e))?;
        log::info!("wrote default config to {}", path.display());
        InstallStatus::Installed
    };

    let config = AppConfig::load(config_dir)?;
    for dir in [config.data_dir(config_dir), config.backup_dir(config_dir)] {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::Io(dir.clone(), e))?;
    }
    Ok(status)
}
