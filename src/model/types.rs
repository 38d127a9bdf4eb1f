//! Core type definitions for the control panel

use std::collections::VecDeque;
use std::time::Instant;

/// Keep this many lines in the status panel
pub const STATUS_HISTORY: usize = 200;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    SongInput,
    Playlist,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::SongInput => ActiveSection::Playlist,
            ActiveSection::Playlist => ActiveSection::SongInput,
        }
    }

    pub fn prev(self) -> Self {
        // Two sections, so backwards is the same hop
        self.next()
    }
}

/// Current values of the control form, sent along with every intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues {
    pub song: String,
    pub volume: u8,
    pub offline: bool,
    pub loop_enabled: bool,
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub song_input: String,
    pub offline: bool,
    pub loop_enabled: bool,
    pub playlist_selected: usize,
    pub status_lines: VecDeque<String>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub busy_workers: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::SongInput,
            song_input: String::new(),
            offline: false,
            loop_enabled: false,
            playlist_selected: 0,
            status_lines: VecDeque::new(),
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
            busy_workers: 0,
        }
    }
}
