use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitoring::domain::event_key::{EventKey, EventTable};
use crate::monitoring::domain::presence_tracker::PresenceConfig;
use crate::shared::constants::{
    BOOK_COOLDOWN_MS, CENTER_THRESHOLD_RATIO, DEVICE_COOLDOWN_MS, LOOKING_AWAY_COOLDOWN_MS,
    LOOKING_AWAY_SECONDS, MULTIPLE_FACES_COOLDOWN_MS, NO_FACE_COOLDOWN_MS, NO_FACE_SECONDS,
    OBJECT_CONFIDENCE_THRESHOLD, OBJECT_POLL_INTERVAL_MS, PHONE_COOLDOWN_MS, SETTINGS_DIR_NAME,
    SETTINGS_FILE_NAME,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },
}

/// Per-key cooldowns in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CooldownSettings {
    pub no_face_ms: u64,
    pub looking_away_ms: u64,
    pub multiple_faces_ms: u64,
    pub phone_ms: u64,
    pub book_ms: u64,
    pub device_ms: u64,
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self {
            no_face_ms: NO_FACE_COOLDOWN_MS,
            looking_away_ms: LOOKING_AWAY_COOLDOWN_MS,
            multiple_faces_ms: MULTIPLE_FACES_COOLDOWN_MS,
            phone_ms: PHONE_COOLDOWN_MS,
            book_ms: BOOK_COOLDOWN_MS,
            device_ms: DEVICE_COOLDOWN_MS,
        }
    }
}

impl CooldownSettings {
    pub fn to_table(&self) -> EventTable<Duration> {
        EventTable::from_fn(|key| {
            let ms = match key {
                EventKey::NoFace => self.no_face_ms,
                EventKey::LookingAway => self.looking_away_ms,
                EventKey::MultipleFaces => self.multiple_faces_ms,
                EventKey::Phone => self.phone_ms,
                EventKey::Book => self.book_ms,
                EventKey::Device => self.device_ms,
            };
            Duration::from_millis(ms)
        })
    }
}

/// Tunables of the event-derivation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorSettings {
    pub no_face_seconds: u64,
    pub looking_away_seconds: u64,
    pub center_threshold: f64,
    pub object_confidence: f64,
    pub object_poll_interval_ms: u64,
    pub cooldowns: CooldownSettings,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            no_face_seconds: NO_FACE_SECONDS,
            looking_away_seconds: LOOKING_AWAY_SECONDS,
            center_threshold: CENTER_THRESHOLD_RATIO,
            object_confidence: OBJECT_CONFIDENCE_THRESHOLD,
            object_poll_interval_ms: OBJECT_POLL_INTERVAL_MS,
            cooldowns: CooldownSettings::default(),
        }
    }
}

impl MonitorSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Reads and validates settings from a JSON file. Fields absent from the
    /// file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from the user config directory, or defaults when the file is
    /// missing or unusable.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.center_threshold > 0.0 && self.center_threshold <= 1.0) {
            return Err(SettingsError::Invalid {
                field: "centerThreshold",
                expected: "in (0, 1]",
            });
        }
        if !(self.object_confidence > 0.0 && self.object_confidence <= 1.0) {
            return Err(SettingsError::Invalid {
                field: "objectConfidence",
                expected: "in (0, 1]",
            });
        }
        if self.object_poll_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "objectPollIntervalMs",
                expected: "positive",
            });
        }
        Ok(())
    }

    pub fn presence_config(&self) -> PresenceConfig {
        PresenceConfig {
            no_face_after: Duration::from_secs(self.no_face_seconds),
            looking_away_after: Duration::from_secs(self.looking_away_seconds),
            center_threshold: self.center_threshold,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.object_poll_interval_ms)
    }
}
