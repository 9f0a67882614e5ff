//! Settings - flat configuration blob persisted as a single JSON file
//!
//! The store is the one piece of durable state in the system. Import does
//! no schema validation beyond well-formed JSON of the right shape; a
//! malformed document errors out and leaves the prior settings untouched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FarmError;

pub const DEFAULT_SETTINGS_FILE: &str = "agrobot-settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkingSettings {
    /// Minimum hours between milkings
    pub min_interval: u32,
    /// Maximum session length, minutes
    pub max_session_time: u32,
    /// Minimum volume to close a session, litres
    pub min_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationSettings {
    pub rfid: bool,
    pub visual: bool,
    /// Weight-based fallback identification
    pub weight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub system_errors: bool,
    pub maintenance: bool,
    pub low_quality: bool,
    pub daily_reports: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub auto_backup: bool,
    /// Hours between backups
    pub backup_interval: u32,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub milking: MilkingSettings,
    pub identification: IdentificationSettings,
    pub notifications: NotificationSettings,
    pub system: SystemSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            milking: MilkingSettings {
                min_interval: 6,
                max_session_time: 15,
                min_volume: 2.5,
            },
            identification: IdentificationSettings {
                rfid: true,
                visual: true,
                weight: false,
            },
            notifications: NotificationSettings {
                system_errors: true,
                maintenance: true,
                low_quality: false,
                daily_reports: false,
            },
            system: SystemSettings {
                auto_backup: true,
                backup_interval: 24,
                log_level: "info".into(),
            },
        }
    }
}

impl Settings {
    pub fn to_json_pretty(&self) -> Result<String, FarmError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, FarmError> {
        serde_json::from_str(json).map_err(|e| FarmError::SettingsImport {
            details: e.to_string(),
        })
    }
}

/// File-backed settings store
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, FarmError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Settings::from_json(&json)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), FarmError> {
        std::fs::write(&self.path, settings.to_json_pretty()?)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Read a settings document from an arbitrary file. The caller keeps
    /// its current settings if this fails.
    pub fn import(&self, from: &Path) -> Result<Settings, FarmError> {
        let json = std::fs::read_to_string(from)?;
        Settings::from_json(&json)
    }

    /// Write a file-backed copy of the given settings.
    pub fn export(&self, settings: &Settings, to: &Path) -> Result<(), FarmError> {
        std::fs::write(to, settings.to_json_pretty()?)?;
        Ok(())
    }
}

/// Name for a dated settings export, matching the legacy download name.
pub fn export_file_name() -> String {
    format!(
        "milking-system-settings-{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_shipped_config() {
        let s = Settings::default();
        assert_eq!(s.milking.min_interval, 6);
        assert_eq!(s.milking.max_session_time, 15);
        assert_eq!(s.milking.min_volume, 2.5);
        assert!(s.identification.rfid);
        assert!(!s.identification.weight);
        assert!(s.notifications.system_errors);
        assert!(!s.notifications.daily_reports);
        assert_eq!(s.system.backup_interval, 24);
        assert_eq!(s.system.log_level, "info");
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json["milking"]["minInterval"].is_number());
        assert!(json["identification"]["rfid"].is_boolean());
        assert!(json["notifications"]["systemErrors"].is_boolean());
        assert!(json["system"]["autoBackup"].is_boolean());
    }

    #[test]
    fn save_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let mut settings = Settings::default();
        settings.milking.min_interval = 8;
        settings.system.log_level = "debug".into();
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn load_without_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("missing.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn import_then_export_reproduces_document() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let source = dir.path().join("incoming.json");
        let mut settings = Settings::default();
        settings.identification.weight = true;
        settings.notifications.low_quality = true;
        std::fs::write(&source, settings.to_json_pretty().unwrap()).unwrap();

        let imported = store.import(&source).unwrap();
        assert_eq!(imported, settings);

        let target = dir.path().join("outgoing.json");
        store.export(&imported, &target).unwrap();
        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        let original: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&source).unwrap()).unwrap();
        assert_eq!(exported, original);
    }

    #[test]
    fn malformed_import_leaves_prior_state() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let current = Settings::default();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json at all").unwrap();

        let err = store.import(&bad).unwrap_err();
        assert!(matches!(err, FarmError::SettingsImport { .. }));
        // Prior state untouched
        assert_eq!(current, Settings::default());
    }

    #[test]
    fn wrong_shape_is_an_import_error() {
        let err = Settings::from_json("{\"milking\": 3}").unwrap_err();
        assert!(matches!(err, FarmError::SettingsImport { .. }));
    }

    #[test]
    fn export_file_name_is_dated() {
        let name = export_file_name();
        assert!(name.starts_with("milking-system-settings-"));
        assert!(name.ends_with(".json"));
    }
}
