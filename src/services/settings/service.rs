use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridSettings;

const CONFIG_FILE: &str = "grid.toml";

/// Loads and stores [`GridSettings`] as a TOML file
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service rooted at the per-user config directory, falling back to the
    /// working directory when no home directory can be resolved.
    pub fn from_default_location() -> Self {
        Self::new(default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current settings. A missing file yields the defaults.
    pub fn get(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            return Ok(GridSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: GridSettings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        Ok(settings)
    }

    /// Validate and write `settings`
    pub fn update(&self, settings: &GridSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        log::info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        self.update(&GridSettings::default())
    }

    /// Settings from disk, or the defaults if they cannot be loaded
    pub fn load_or_default(&self) -> GridSettings {
        match self.get() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {:#}, using defaults", e);
                GridSettings::default()
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("com", "Ken24T", "TimetableGrid") {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}
