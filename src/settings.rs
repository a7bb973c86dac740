//! Settings infrastructure for format range planning.
//!
//! This module loads `settings.toml` files configuring how requested ranges
//! are seeded, how the range expansion walk is driven and which formatter
//! markers disable formatting.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::block::DriveOptions;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub format: FormatSettings,
}

/// Options for building and expanding a format plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Heading whitespace flag given to the requested ranges (default: true).
    pub process_heading_whitespace: bool,

    /// Walker steps between yields when driven asynchronously (default: 256).
    pub steps_per_yield: usize,

    /// Formatter on/off markers.
    pub markers: MarkerSettings,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            process_heading_whitespace: true,
            steps_per_yield: DriveOptions::default().steps_per_yield,
            markers: MarkerSettings::default(),
        }
    }
}

impl FormatSettings {
    pub fn drive_options(&self) -> DriveOptions {
        DriveOptions {
            steps_per_yield: self.steps_per_yield,
        }
    }
}

/// Markers excluding text from formatting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub enabled: bool,

    /// Marker starting a disabled region.
    pub off_tag: String,

    /// Marker ending a disabled region.
    pub on_tag: String,

    /// Treat the tags as regular expressions instead of literal text.
    pub accept_regexp: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            off_tag: "@formatter:off".to_string(),
            on_tag: "@formatter:on".to_string(),
            accept_regexp: false,
        }
    }
}

/// Read and parse a settings.toml file.
pub fn try_load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match try_load_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Read { .. }) => Settings::default(),
        Err(e) => {
            warn!("{}, using defaults", e);
            Settings::default()
        }
    }
}

const SETTINGS_FILE: &str = "settings.toml";

/// Find the settings governing `start_dir`.
///
/// `start_dir` and its ancestors are tried first, nearest first. Failing
/// that, the first direct child directory holding a settings file is used.
///
/// Returns the settings together with the directory they were found in, or
/// the defaults and `start_dir` when there is no settings file.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let found = start_dir
        .ancestors()
        .find(|dir| dir.join(SETTINGS_FILE).is_file())
        .map(Path::to_path_buf)
        .or_else(|| child_with_settings(start_dir));

    match found {
        Some(dir) => {
            debug!("using {} from {}", SETTINGS_FILE, dir.display());
            (load_settings(&dir.join(SETTINGS_FILE)), dir)
        }
        None => (Settings::default(), start_dir.to_path_buf()),
    }
}

fn child_with_settings(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.is_dir() && path.join(SETTINGS_FILE).is_file())
}
