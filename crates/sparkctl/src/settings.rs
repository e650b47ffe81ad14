//! Persisted settings.
//!
//! Stored as TOML in the platform config directory. Missing files and
//! missing keys fall back to the defaults. A file named explicitly on the
//! command line must exist and parse.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A settings file that was asked for could not be used.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Root settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub local: LocalSettings,
}

/// Hosted repository holding the device library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub owner: String,
    pub repo: String,
    pub base_branch: String,
    pub api_url: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            owner: "hardwario".to_string(),
            repo: "enerooo-spark-device-library".to_string(),
            base_branch: "main".to_string(),
            api_url: spark_source::remote::DEFAULT_API_URL.to_string(),
        }
    }
}

/// Local checkout of the device library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    pub path: PathBuf,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Load settings from a file the user named explicitly.
    ///
    /// Unlike [`Self::load_from`], a missing or malformed file is an error.
    pub fn load_required(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "hardwario", "sparkctl")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("sparkctl.toml"))
    }
}
