//! Model module - Application state and data types
//!
//! - `track`: Track references, playback requests and play sources
//! - `playlist`: The queued playlist
//! - `settings`: The persisted settings document and its store
//! - `types`: UI state types
//! - `app_model`: Main application model with state management methods

mod app_model;
mod playlist;
mod settings;
mod track;
mod types;

pub use track::{PlaySource, PlaybackRequest, TrackQuery, TrackRef};

pub use playlist::Playlist;

pub use settings::{Settings, SettingsStore};

pub use types::{ActiveSection, FormValues, UiState};

pub use app_model::AppModel;

#[cfg(test)]
pub use app_model::THEME_NAMES;
