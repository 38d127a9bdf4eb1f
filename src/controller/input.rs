//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::{AppController, Intent};

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = &self.model;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        // Control shortcuts work from either section
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && let KeyCode::Char(c) = key.code
        {
            if let Some(intent) = Self::control_intent(c) {
                self.dispatch(intent).await;
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        match key.code {
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
                return Ok(());
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
                return Ok(());
            }
            _ => {}
        }

        // Handle the song field when it has focus
        if ui_state.active_section == ActiveSection::SongInput {
            match key.code {
                KeyCode::Enter => {
                    self.dispatch(Intent::Play).await;
                }
                KeyCode::Esc => {
                    model.clear_input().await;
                }
                KeyCode::Backspace => {
                    model.backspace_input().await;
                }
                KeyCode::Char(c) => {
                    model.append_to_input(c).await;
                }
                KeyCode::Up => {
                    self.step_volume(true).await;
                }
                KeyCode::Down => {
                    self.step_volume(false).await;
                }
                _ => {}
            }
            return Ok(());
        }

        // Playlist section and single-key shortcuts
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.dispatch(Intent::Exit).await;
            }
            KeyCode::Up => {
                model.playlist_move_up().await;
            }
            KeyCode::Down => {
                model.playlist_move_down().await;
            }
            KeyCode::Enter => {
                self.dispatch(Intent::Play).await;
            }
            KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('X') => {
                self.dispatch(Intent::RemoveSelected).await;
            }
            KeyCode::Char(' ') => {
                self.dispatch(Intent::Pause).await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.dispatch(Intent::Stop).await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.dispatch(Intent::Next).await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.dispatch(Intent::AddToPlaylist).await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.dispatch(Intent::ClearPlaylist).await;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.dispatch(Intent::ChangeTheme).await;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.dispatch(Intent::ToggleLoop).await;
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.dispatch(Intent::ToggleOffline).await;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.step_volume(true).await;
            }
            KeyCode::Char('-') => {
                self.step_volume(false).await;
            }
            // Focus the song field
            KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Esc => {
                model.set_active_section(ActiveSection::SongInput).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    fn control_intent(c: char) -> Option<Intent> {
        match c.to_ascii_lowercase() {
            'q' => Some(Intent::Exit),
            'p' => Some(Intent::Pause),
            's' => Some(Intent::Stop),
            'n' => Some(Intent::Next),
            'a' => Some(Intent::AddToPlaylist),
            'x' => Some(Intent::ClearPlaylist),
            't' => Some(Intent::ChangeTheme),
            'l' => Some(Intent::ToggleLoop),
            'o' => Some(Intent::ToggleOffline),
            _ => None,
        }
    }

    async fn step_volume(&self, up: bool) {
        let before = self.model.form_values().await.volume;
        let volume = if up {
            self.model.volume_up().await
        } else {
            self.model.volume_down().await
        };
        // Persists and reports the new level
        if volume != before {
            self.dispatch(Intent::VolumeChanged(volume)).await;
        }
    }
}
