//! Durable settings document: theme, volume and the queued playlist.
//!
//! The whole document is rewritten on every change. A missing file is not an
//! error, it simply yields [`Settings::default`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};
use super::playlist::Playlist;

pub const DEFAULT_THEME: &str = "Dark";
pub const DEFAULT_VOLUME_PERCENT: u8 = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub playlist: Playlist,
    /// Reserved, kept so older documents survive a rewrite
    #[serde(default)]
    pub cache: BTreeMap<String, serde_json::Value>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

const fn default_volume() -> u8 {
    DEFAULT_VOLUME_PERCENT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            volume: default_volume(),
            playlist: Playlist::new(),
            cache: BTreeMap::new(),
        }
    }
}

/// Reads and writes [`Settings`] at a fixed path
#[derive(Clone, Debug)]
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

    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut settings: Settings = serde_json::from_str(&content)?;
        settings.volume = settings.volume.min(100);
        Ok(settings)
    }

    /// Write the full document. Goes through a sibling temp file and a rename,
    /// so readers see either the old or the new document.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.write(settings).map_err(|e| PlayerError::PersistenceFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
