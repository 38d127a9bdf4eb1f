//! Main application model with state management

use std::time::Instant;
use tokio::sync::Mutex;

use super::settings::Settings;
use super::track::TrackRef;
use super::types::{ActiveSection, FormValues, UiState, STATUS_HISTORY};

const VOLUME_STEP: u8 = 5;
const ERROR_DISPLAY_SECS: u64 = 5;

/// Theme names cycled by ChangeTheme, in order
pub const THEME_NAMES: [&str; 5] = ["Dark", "Light", "Ocean", "Forest", "Amber"];

/// Main application model containing all UI and settings state
pub struct AppModel {
    ui_state: Mutex<UiState>,
    settings: Mutex<Settings>,
    should_quit: Mutex<bool>,
}

impl AppModel {
    pub fn new(settings: Settings) -> Self {
        Self {
            ui_state: Mutex::new(UiState::default()),
            settings: Mutex::new(settings),
            should_quit: Mutex::new(false),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Form
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn form_values(&self) -> FormValues {
        let state = self.ui_state.lock().await;
        let volume = self.settings.lock().await.volume;
        FormValues {
            song: state.song_input.clone(),
            volume,
            offline: state.offline,
            loop_enabled: state.loop_enabled,
        }
    }

    pub async fn append_to_input(&self, c: char) {
        self.ui_state.lock().await.song_input.push(c);
    }

    pub async fn backspace_input(&self) {
        self.ui_state.lock().await.song_input.pop();
    }

    pub async fn clear_input(&self) {
        self.ui_state.lock().await.song_input.clear();
    }

    pub async fn toggle_offline(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        state.offline = !state.offline;
        state.offline
    }

    pub async fn toggle_loop(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        state.loop_enabled = !state.loop_enabled;
        state.loop_enabled
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    // ========================================================================
    // Status panel, errors, help
    // ========================================================================

    pub async fn push_status(&self, line: impl Into<String>) {
        let line = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line.into());
        let mut state = self.ui_state.lock().await;
        state.status_lines.push_back(line);
        while state.status_lines.len() > STATUS_HISTORY {
            state.status_lines.pop_front();
        }
    }

    #[cfg(test)]
    pub async fn latest_status(&self) -> Option<String> {
        self.ui_state.lock().await.status_lines.back().cloned()
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp
            && timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS
        {
            state.error_message = None;
            state.error_timestamp = None;
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn worker_started(&self) {
        self.ui_state.lock().await.busy_workers += 1;
    }

    pub async fn worker_finished(&self) {
        let mut state = self.ui_state.lock().await;
        state.busy_workers = state.busy_workers.saturating_sub(1);
    }

    // ========================================================================
    // Settings: volume, theme, playlist
    // ========================================================================

    pub async fn get_settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    pub async fn set_volume(&self, volume: u8) -> u8 {
        let mut settings = self.settings.lock().await;
        settings.volume = volume.min(100);
        settings.volume
    }

    pub async fn volume_up(&self) -> u8 {
        let mut settings = self.settings.lock().await;
        settings.volume = settings.volume.saturating_add(VOLUME_STEP).min(100);
        settings.volume
    }

    pub async fn volume_down(&self) -> u8 {
        let mut settings = self.settings.lock().await;
        settings.volume = settings.volume.saturating_sub(VOLUME_STEP);
        settings.volume
    }

    /// Move to the theme after the current one; unknown names restart the cycle
    pub async fn next_theme(&self) -> String {
        let mut settings = self.settings.lock().await;
        let next = THEME_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(&settings.theme))
            .map_or(0, |i| (i + 1) % THEME_NAMES.len());
        settings.theme = THEME_NAMES[next].to_string();
        settings.theme.clone()
    }

    pub async fn add_to_playlist(&self, reference: TrackRef) -> usize {
        let mut settings = self.settings.lock().await;
        settings.playlist.push(reference);
        settings.playlist.len()
    }

    pub async fn pop_playlist_front(&self) -> Option<TrackRef> {
        let front = self.settings.lock().await.playlist.pop_front();
        if front.is_some() {
            self.clamp_playlist_selection().await;
        }
        front
    }

    pub async fn clear_playlist(&self) -> usize {
        let mut settings = self.settings.lock().await;
        let removed = settings.playlist.len();
        settings.playlist.clear();
        drop(settings);
        self.ui_state.lock().await.playlist_selected = 0;
        removed
    }

    pub async fn remove_selected_from_playlist(&self) -> Option<TrackRef> {
        let selected = self.ui_state.lock().await.playlist_selected;
        let removed = self.settings.lock().await.playlist.remove(selected);
        if removed.is_some() {
            self.clamp_playlist_selection().await;
        }
        removed
    }

    pub async fn playlist_move_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.playlist_selected = state.playlist_selected.saturating_sub(1);
    }

    pub async fn playlist_move_down(&self) {
        let len = self.settings.lock().await.playlist.len();
        let mut state = self.ui_state.lock().await;
        if state.playlist_selected < len.saturating_sub(1) {
            state.playlist_selected += 1;
        }
    }

    async fn clamp_playlist_selection(&self) {
        let len = self.settings.lock().await.playlist.len();
        let mut state = self.ui_state.lock().await;
        state.playlist_selected = state.playlist_selected.min(len.saturating_sub(1));
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
