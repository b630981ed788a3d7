//! Settings module - create-form defaults
//! - stored as JSON (`byFrame`, `fileType`)
//! - injected into the create form, never read from ambient state

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "config-dir")]
use std::path::PathBuf;

use crate::formats::FileType;

#[cfg(feature = "config-dir")]
const CONFIG_FILE_NAME: &str = "settings.json";
#[cfg(feature = "config-dir")]
const APP_NAME: &str = "studio-anim";

/// Playblast step bounds accepted by the create form
pub const BY_FRAME_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimSettings {
    /// Capture every n-th frame of the preview sequence
    pub by_frame: u32,
    pub file_type: FileType,
}

impl Default for AnimSettings {
    fn default() -> Self {
        Self {
            by_frame: 1,
            file_type: FileType::Json,
        }
    }
}

impl AnimSettings {
    /// Load settings from `path`; a missing or unreadable file yields defaults
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str::<Self>(&content) {
            Ok(mut settings) => {
                settings.by_frame = settings
                    .by_frame
                    .clamp(*BY_FRAME_RANGE.start(), *BY_FRAME_RANGE.end());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    // ========== Per-user config directory ==========

    /// Get config file path
    #[cfg(feature = "config-dir")]
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load settings from the per-user config file
    #[cfg(feature = "config-dir")]
    pub fn load_from_config_dir() -> Self {
        Self::config_file_path()
            .map(|path| Self::load(&path))
            .unwrap_or_default()
    }

    /// Save settings to the per-user config file
    #[cfg(feature = "config-dir")]
    pub fn save_to_config_dir(&self) -> Result<()> {
        let path = Self::config_file_path()
            .context("Failed to get config directory")?;
        self.save(&path)
    }

    // ========== Fallback: No persistent storage ==========

    #[cfg(not(feature = "config-dir"))]
    pub fn load_from_config_dir() -> Self {
        Self::default()
    }

    #[cfg(not(feature = "config-dir"))]
    pub fn save_to_config_dir(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested/settings.json");

        let settings = AnimSettings { by_frame: 2, file_type: FileType::Csv };
        settings.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"byFrame\": 2"));
        assert!(content.contains("\"fileType\": \"csv\""));
        assert_eq!(AnimSettings::load(&path), settings);
    }

    #[test]
    fn test_defaults_on_missing_or_partial_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        assert_eq!(AnimSettings::load(&path), AnimSettings::default());

        fs::write(&path, r#"{"byFrame": 5000}"#).unwrap();
        assert_eq!(
            AnimSettings::load(&path),
            AnimSettings { by_frame: 1000, file_type: FileType::Json }
        );

        fs::write(&path, "garbage").unwrap();
        assert_eq!(AnimSettings::load(&path), AnimSettings::default());
    }
}
