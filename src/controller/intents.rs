//! The intent set and its dispatch
//!
//! Every intent is handled against the form values at the moment it is
//! dispatched. Anything that may block on yt-dlp runs on a worker, the rest
//! completes inline.

use tokio::task::JoinHandle;

use crate::model::{FormValues, PlaybackRequest, TrackQuery, TrackRef};
use crate::session::{PauseOutcome, PlayOptions, PlayOutcome};

use super::AppController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Play,
    Pause,
    Stop,
    Next,
    AddToPlaylist,
    ClearPlaylist,
    RemoveSelected,
    ChangeTheme,
    ToggleLoop,
    ToggleOffline,
    VolumeChanged(u8),
    Exit,
}

impl AppController {
    /// Handle `intent`. Returns the worker handle when the work continues in
    /// the background.
    pub async fn dispatch(&self, intent: Intent) -> Option<JoinHandle<()>> {
        let form = self.model.form_values().await;
        tracing::debug!(?intent, song = %form.song, volume = form.volume, offline = form.offline, "Dispatching intent");

        match intent {
            Intent::Play => return Some(self.play(form)),
            Intent::Next => return self.next(form).await,
            Intent::AddToPlaylist => return self.add_to_playlist(form).await,
            Intent::Pause => self.toggle_pause().await,
            Intent::Stop => self.stop().await,
            Intent::ClearPlaylist => {
                let removed = self.model.clear_playlist().await;
                self.persist().await;
                tracing::info!(removed, "Playlist cleared");
                self.model.push_status("Playlist cleared").await;
            }
            Intent::RemoveSelected => {
                if let Some(reference) = self.model.remove_selected_from_playlist().await {
                    self.persist().await;
                    self.model.push_status(format!("Removed from playlist: {reference}")).await;
                }
            }
            Intent::ChangeTheme => {
                let theme = self.model.next_theme().await;
                self.persist().await;
                tracing::info!(theme = %theme, "Theme changed");
                self.model.push_status(format!("Theme: {theme}")).await;
            }
            Intent::ToggleLoop => {
                let enabled = self.model.toggle_loop().await;
                self.session.set_loop(enabled).await;
                self.model
                    .push_status(if enabled { "Loop on" } else { "Loop off" })
                    .await;
            }
            Intent::ToggleOffline => {
                let offline = self.model.toggle_offline().await;
                self.model
                    .push_status(if offline { "Offline mode on" } else { "Offline mode off" })
                    .await;
            }
            Intent::VolumeChanged(volume) => {
                let volume = self.model.set_volume(volume).await;
                self.persist().await;
                tracing::debug!(volume, "Volume changed");
                self.model
                    .push_status(format!("Volume: {volume}% (applies to the next track)"))
                    .await;
            }
            Intent::Exit => {
                self.session.stop().await;
                self.model.set_should_quit(true).await;
                tracing::info!("Exit requested");
            }
        }
        None
    }

    fn play(&self, form: FormValues) -> JoinHandle<()> {
        let request = PlaybackRequest::new(TrackQuery::from_input(&form.song), form.volume)
            .offline(form.offline)
            .looping(form.loop_enabled);
        // In line from now, not from when a worker frees up
        let ticket = self.session.reserve();
        let session = self.session.clone();

        self.spawn_worker("play", async move {
            match session.play(ticket, request).await {
                Ok(PlayOutcome::Started(reference)) => {
                    tracing::debug!(reference = %reference, "Play completed");
                }
                Ok(PlayOutcome::Superseded) => {}
                // Already reported through the session events
                Err(e) => tracing::debug!(error = %e, "Play did not start"),
            }
        })
    }

    async fn next(&self, form: FormValues) -> Option<JoinHandle<()>> {
        let Some(front) = self.model.pop_playlist_front().await else {
            self.model.push_status("Playlist is empty").await;
            return None;
        };
        self.persist().await;

        let options = PlayOptions {
            volume: form.volume,
            offline: form.offline,
            loop_enabled: form.loop_enabled,
        };
        let ticket = self.session.reserve();
        let session = self.session.clone();
        Some(self.spawn_worker("next", async move {
            if let Err(e) = session.next(ticket, Some(front), options).await {
                tracing::debug!(error = %e, "Next did not start");
            }
        }))
    }

    async fn toggle_pause(&self) {
        match self.session.toggle_pause().await {
            Ok(PauseOutcome::Idle) => self.model.push_status("Nothing is playing").await,
            Ok(outcome) => tracing::info!(?outcome, "Pause toggled"),
            Err(e) => {
                tracing::error!(error = %e, "Toggle pause failed");
                self.model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    async fn stop(&self) {
        if !self.session.stop().await {
            self.model.push_status("Nothing is playing").await;
        }
    }

    /// Queue the song field. A URL goes straight in, free text is searched
    /// first on a worker.
    async fn add_to_playlist(&self, form: FormValues) -> Option<JoinHandle<()>> {
        let text = form.song.trim().to_string();
        if text.is_empty() {
            self.model.push_status("Type a song name or URL first").await;
            return None;
        }

        if TrackRef::looks_like_reference(&text) {
            self.queue(TrackRef::new(text)).await;
            return None;
        }

        let controller = self.clone();
        Some(self.spawn_worker("add", async move {
            match controller.session.resolve(&text).await {
                Some(reference) => controller.queue(reference).await,
                None => tracing::info!(query = %text, "Nothing to add to playlist"),
            }
        }))
    }

    async fn queue(&self, reference: TrackRef) {
        let len = self.model.add_to_playlist(reference.clone()).await;
        self.persist().await;
        tracing::info!(reference = %reference, len, "Added to playlist");
        self.model.push_status(format!("Added to playlist: {reference}")).await;
    }
}
