#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Plot settings store with TOML file persistence.
//!
//! The viewer keeps three app-level settings: the plot date range and the
//! bar-chart sort period. They are read and written by name through the
//! [`SettingsStore`] trait so handlers take an injected store instead of
//! reaching for ambient global state. The file-backed store persists the
//! whole settings table as TOML on every write.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Setting name for the plot range start date (`MM/DD/YYYY`).
pub const PLOT_START_DATE: &str = "plot_start_date";
/// Setting name for the plot range end date (`MM/DD/YYYY`).
pub const PLOT_END_DATE: &str = "plot_end_date";
/// Setting name for the bar-chart sort period (`"month"` or `"week"`).
pub const SORT_TYPE: &str = "sort_type";

/// Errors that can occur reading or writing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The named setting is not part of the known set.
    #[error("Unknown setting '{name}'")]
    UnknownSetting {
        /// The name that was requested.
        name: String,
    },

    /// I/O error reading or writing the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings table could not be serialized.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The three persisted plot settings with the app's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Start of the plotted date range.
    pub plot_start_date: String,
    /// End of the plotted date range.
    pub plot_end_date: String,
    /// Bar-chart bucketing period.
    pub sort_type: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            plot_start_date: "09/30/2024".to_string(),
            plot_end_date: "09/30/2024".to_string(),
            sort_type: "month".to_string(),
        }
    }
}

impl PlotSettings {
    fn get(&self, name: &str) -> Result<String, SettingsError> {
        match name {
            PLOT_START_DATE => Ok(self.plot_start_date.clone()),
            PLOT_END_DATE => Ok(self.plot_end_date.clone()),
            SORT_TYPE => Ok(self.sort_type.clone()),
            _ => Err(SettingsError::UnknownSetting {
                name: name.to_string(),
            }),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
        match name {
            PLOT_START_DATE => self.plot_start_date = value.to_string(),
            PLOT_END_DATE => self.plot_end_date = value.to_string(),
            SORT_TYPE => self.sort_type = value.to_string(),
            _ => {
                return Err(SettingsError::UnknownSetting {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Named-setting access injected into the plot and settings-update handlers.
pub trait SettingsStore: Send + Sync {
    /// Reads a setting by name.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownSetting`] for a name outside the
    /// known set, or a persistence error from the backing store.
    fn get(&self, name: &str) -> Result<String, SettingsError>;

    /// Writes a setting by name.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownSetting`] for a name outside the
    /// known set, or a persistence error from the backing store.
    fn set(&self, name: &str, value: &str) -> Result<(), SettingsError>;
}

/// In-memory store. Used in tests and when no settings path is configured.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: Mutex<PlotSettings>,
}

impl MemorySettings {
    /// Store seeded with the app defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, name: &str) -> Result<String, SettingsError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<(), SettingsError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(name, value)
    }
}

/// TOML-file-backed store. The full settings table is rewritten on every
/// `set`.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    inner: Mutex<PlotSettings>,
}

impl FileSettings {
    /// Loads settings from `path`, seeding the file with defaults if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file cannot be read, parsed, or
    /// initially written.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = if path.exists() {
            toml::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            let defaults = PlotSettings::default();
            write_settings(&path, &defaults)?;
            defaults
        };

        Ok(Self {
            path,
            inner: Mutex::new(settings),
        })
    }
}

fn write_settings(path: &Path, settings: &PlotSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}

impl SettingsStore for FileSettings {
    fn get(&self, name: &str) -> Result<String, SettingsError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<(), SettingsError> {
        let mut settings = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        settings.set(name, value)?;
        write_settings(&self.path, &settings)
    }
}
