//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that turns user input into
//! intents, runs them against the player session and keeps the settings file
//! in step with the model. It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `intents`: The intent set and its dispatch
//! - `session_events`: Player session event listener

mod input;
mod intents;
mod session_events;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

use crate::error::PlayerError;
use crate::model::{AppModel, SettingsStore};
use crate::session::PlayerSession;

pub use intents::Intent;

/// Background workers allowed to search/download at the same time
pub const MAX_WORKERS: usize = 4;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) session: PlayerSession,
    store: Arc<SettingsStore>,
    /// Held from snapshot to rename, so saves land one at a time and in order
    persist_lock: Arc<Mutex<()>>,
    workers: Arc<Semaphore>,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, session: PlayerSession, store: SettingsStore) -> Self {
        Self {
            model,
            session,
            store: Arc::new(store),
            persist_lock: Arc::new(Mutex::new(())),
            workers: Arc::new(Semaphore::new(MAX_WORKERS)),
        }
    }

    pub(crate) fn format_error(error: &PlayerError) -> String {
        match error {
            PlayerError::NotFound { .. } => "Song not found, please try again.".to_string(),
            PlayerError::SearchFailed { .. } => {
                "Search failed. Check your connection and yt-dlp install.".to_string()
            }
            PlayerError::FetchFailed { .. } => {
                "Download failed. Check your connection and yt-dlp install.".to_string()
            }
            PlayerError::LaunchFailed { program, .. } => {
                format!("Could not start {program}. Is it installed?")
            }
            PlayerError::Signal { .. } | PlayerError::SignalUnsupported => {
                "Could not pause or resume the player.".to_string()
            }
            PlayerError::PersistenceFailed { reason, .. } => {
                format!("Could not save settings: {reason}")
            }
            other => format!("Error: {other}"),
        }
    }

    /// Write the current settings document. Failures are shown and logged,
    /// the session carries on either way.
    pub(crate) async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let settings = self.model.get_settings().await;
        let store = self.store.clone();
        let saved = tokio::task::spawn_blocking(move || store.save(&settings)).await;

        let error = match saved {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(join) => PlayerError::PersistenceFailed {
                path: self.store.path().to_path_buf(),
                reason: join.to_string(),
            },
        };
        tracing::error!(error = %error, "Failed to save settings");
        self.model.set_error(Self::format_error(&error)).await;
    }

    /// Run `work` in the background once a worker slot is free
    pub(crate) fn spawn_worker<F>(&self, name: &'static str, work: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let workers = self.workers.clone();
        let model = self.model.clone();
        tokio::spawn(async move {
            let Ok(_permit) = workers.acquire_owned().await else {
                tracing::warn!(worker = name, "Worker pool closed");
                return;
            };
            tracing::debug!(worker = name, "Worker started");
            model.worker_started().await;
            work.await;
            model.worker_finished().await;
            tracing::debug!(worker = name, "Worker finished");
        })
    }
}
