//! Error types shared by the media adapters, the player session and the store

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    // Search / download
    #[error("No results for \"{query}\"")]
    NotFound { query: String },

    #[error("Search for \"{query}\" failed: {reason}")]
    SearchFailed { query: String, reason: String },

    #[error("Download of {reference} failed: {reason}")]
    FetchFailed { reference: String, reason: String },

    // External player
    #[error("Could not launch {program}: {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Could not signal player process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Suspending the player is not supported on this platform")]
    SignalUnsupported,

    // Settings
    #[error("Could not write settings to {path}: {reason}")]
    PersistenceFailed { path: PathBuf, reason: String },

    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
