//! Registry settings, loaded from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SettingsError;
use crate::identity::MAX_STRING_LEN;

/// Tunables for the named registries and option conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Name lookups through the registry accessors create missing entries.
    pub insert_on_read: bool,
    /// Text buffer size for `to_string` output, terminator included.
    pub string_buffer_len: usize,
    /// Longest string accepted for a string-typed config option.
    pub max_option_string_len: usize,
    /// Identity name that receives fake-IP assignment results.
    pub fake_ip_identity_name: String,
    /// Address name that caches the last remote fake IP lookup.
    pub remote_fake_ip_address_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            insert_on_read: true,
            string_buffer_len: MAX_STRING_LEN,
            max_option_string_len: 1024,
            fake_ip_identity_name: "fake_ip".into(),
            remote_fake_ip_address_name: "remote_fake_ip".into(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("no settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&data)?;
        settings.validate()?;
        debug!("loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Writes the settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.string_buffer_len == 0 {
            return Err(SettingsError::Invalid(
                "stringBufferLen must be at least 1".into(),
            ));
        }
        if self.fake_ip_identity_name.is_empty() || self.remote_fake_ip_address_name.is_empty() {
            return Err(SettingsError::Invalid("reserved names must not be empty".into()));
        }
        Ok(())
    }
}

/// Returns the default settings path.
pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("steamserver").join("networking.json"))
}

/// Returns the platform-specific config directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}
