use crate::types::AuthorizationOptions;
use anyhow::{anyhow, Result};
use log::info as log_info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Facade configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeSettings {
    /// Capabilities requested by the default authorization calls
    pub authorization_options: AuthorizationOptions,

    /// Attach the default sound to scheduled notifications
    pub default_sound: bool,
}

impl Default for FacadeSettings {
    fn default() -> Self {
        Self {
            authorization_options: AuthorizationOptions::all(),
            default_sound: true,
        }
    }
}

/// Loads and saves [`FacadeSettings`] as JSON
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    /// Store at the platform config directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            settings_path: Self::default_settings_path()?,
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    fn default_settings_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find config directory"))?;

        path.push("local-notifications");
        path.push("notifications.json");
        Ok(path)
    }

    /// Load settings from disk, falling back to defaults when no file exists
    pub async fn load_settings(&self) -> Result<FacadeSettings> {
        if !self.settings_path.exists() {
            log_info!("No notification settings file found, using defaults");
            return Ok(FacadeSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.settings_path).await?;
        let settings: FacadeSettings = serde_json::from_str(&content)?;
        validate_settings(&settings)?;

        log_info!("Loaded notification settings from {}", self.settings_path.display());
        Ok(settings)
    }

    pub async fn save_settings(&self, settings: &FacadeSettings) -> Result<()> {
        validate_settings(settings)?;

        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.settings_path, content).await?;

        log_info!("Saved notification settings to {}", self.settings_path.display());
        Ok(())
    }
}

pub fn validate_settings(settings: &FacadeSettings) -> Result<()> {
    if settings.authorization_options.is_empty() {
        return Err(anyhow!("At least one authorization option must be requested"));
    }
    Ok(())
}
