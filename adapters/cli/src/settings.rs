//! Player preferences persisted between launches as TOML.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use maze_run_core::DifficultyTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default settings file, relative to the working directory.
pub(crate) const DEFAULT_SETTINGS_PATH: &str = "maze-run.toml";

/// Preferences restored on launch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Save the level after every transition and resume from it.
    pub(crate) remember_progress: bool,
    /// Difficulty tier selecting the starting level of a fresh run.
    pub(crate) tier: DifficultyTier,
    /// Last explicit hint toggle, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) hint_enabled: Option<bool>,
    /// Level reached in a previous run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) saved_level: Option<u32>,
}

/// Failures raised while reading or writing the settings file.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode settings")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to write settings to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Settings {
    /// Reads settings from disk.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads settings from disk, falling back to defaults on any failure.
    pub(crate) fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!("no settings at {}; using defaults", path.display());
                Self::default()
            }
            Err(error) => {
                warn!("{error}; using defaults");
                Self::default()
            }
        }
    }

    /// Writes settings to disk, creating parent directories as needed.
    pub(crate) fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = toml::to_string(self)?;
        let write_error = |source: io::Error| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, contents).map_err(write_error)
    }

    /// Level a launch begins on.
    pub(crate) fn starting_level(&self) -> u32 {
        let saved = self
            .saved_level
            .filter(|level| self.remember_progress && *level >= 1);
        saved.unwrap_or_else(|| self.tier.starting_level())
    }

    /// Records a newly started level, returning whether anything changed.
    pub(crate) fn record_level(&mut self, level: u32) -> bool {
        if !self.remember_progress || self.saved_level == Some(level) {
            return false;
        }
        self.saved_level = Some(level);
        true
    }
}
