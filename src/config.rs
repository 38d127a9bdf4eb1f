//! Runtime configuration: where files live and which external programs to run.
//!
//! Everything under the data directory (`~/.tunes-rs` by default) belongs to
//! the app: the settings document, the offline audio cache and the log files.
//! User preferences that change at runtime (theme, volume, playlist) are not
//! part of this struct, they live in the settings document.

use std::path::PathBuf;

/// Name of the data directory under the user's home directory
pub const DATA_DIR_NAME: &str = ".tunes-rs";

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const CACHE_DIR_NAME: &str = "cache";
pub const LOG_DIR_NAME: &str = "logs";

pub const DEFAULT_PLAYER_PROGRAM: &str = "mpv";
pub const DEFAULT_DOWNLOADER_PROGRAM: &str = "yt-dlp";

const HOME_ENV: &str = "TUNES_RS_HOME";
const PLAYER_ENV: &str = "TUNES_RS_PLAYER";
const DOWNLOADER_ENV: &str = "TUNES_RS_DOWNLOADER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub player_program: String,
    pub downloader_program: String,
}

impl AppConfig {
    /// Build the configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            data_dir,
            player_program: non_empty(PLAYER_ENV)
                .unwrap_or_else(|| DEFAULT_PLAYER_PROGRAM.to_string()),
            downloader_program: non_empty(DOWNLOADER_ENV)
                .unwrap_or_else(|| DEFAULT_DOWNLOADER_PROGRAM.to_string()),
        }
    }

    /// `~/.tunes-rs/settings.json`
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    /// `~/.tunes-rs/cache`
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join(CACHE_DIR_NAME)
    }

    /// `~/.tunes-rs/logs`
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
