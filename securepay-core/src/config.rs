//! Configuration management
//!
//! settings.json format:
//! ```json
//! {
//!   "app": { "databaseFile": "securepay.duckdb", "keyFile": "secret.key" }
//! }
//! ```
//! A missing or malformed file falls back to defaults; unknown settings are
//! preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

fn default_database_file() -> String {
    "securepay.duckdb".to_string()
}

fn default_key_file() -> String {
    "secret.key".to_string()
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_database_file")]
    database_file: String,
    #[serde(default = "default_key_file")]
    key_file: String,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            key_file: default_key_file(),
            other: HashMap::new(),
        }
    }
}

/// SecurePay configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// File name of the main database within the data directory
    pub database_file: String,
    /// File name of the symmetric key file within the data directory
    pub key_file: String,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            key_file: default_key_file(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            database_file: raw.app.database_file.clone(),
            key_file: raw.app.key_file.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves settings that this view doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.database_file = self.database_file.clone();
        settings.app.key_file = self.key_file.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
