//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `theme`: Named color palettes
//! - `utils`: Shared utility functions (truncation, scrollable lists, popups)
//! - `layout`: Song bar, playlist and status panels
//! - `now_playing`: Bottom bar with the current track, loop count and volume
//! - `overlays`: Modal overlays (error, help)

mod layout;
mod now_playing;
mod overlays;
mod theme;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};

use crate::model::{Settings, UiState};
use crate::session::SessionSnapshot;

use theme::Palette;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState, settings: &Settings, snapshot: &SessionSnapshot) {
        let palette = Palette::named(&settings.theme);
        frame.render_widget(Block::default().style(palette.base()), frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Song field + options
                Constraint::Min(0),    // Playlist + status
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, settings.volume, &palette);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Playlist
                Constraint::Percentage(60), // Status
            ])
            .split(chunks[1]);

        layout::render_playlist(frame, main_chunks[0], ui_state, &settings.playlist, &palette);
        layout::render_status(frame, main_chunks[1], ui_state, &palette);

        now_playing::render_now_playing(frame, chunks[2], snapshot, settings.volume, &palette);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state, &palette);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, &palette);
        }
    }
}
