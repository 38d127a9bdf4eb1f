//! Player session - the single owner of "what is playing now"
//!
//! A Play goes search → (offline) download → launch. Search and download run
//! without the state lock; the launch happens under it, after the previous
//! process has been killed, so there is never more than one player process.
//!
//! Every Play, Next and Stop takes a new generation number, a [`Ticket`],
//! at the moment it is issued. A request whose number is no longer current
//! when its worker starts, or when it reaches the launch step, is dropped
//! (reported as [`PlayOutcome::Superseded`]). Searches and downloads are not
//! cancelled, their results are just discarded.
//!
//! After a launch, one supervisor task waits for the process to exit and then
//! either replays the same source (loop enabled) or returns to idle.

mod events;
mod state;


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::error::{PlayerError, Result};
use crate::media::{Fetcher, Launched, PlayerLauncher, Resolver};
use crate::model::{PlaySource, PlaybackRequest, TrackQuery, TrackRef};
use state::SessionState;

pub use events::SessionEvent;
pub use state::{PauseOutcome, PlayOptions, PlayOutcome, SessionSnapshot};

/// Place in line for a Play or Next, taken when the request is issued
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone)]
pub struct PlayerSession {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    generation: AtomicU64,
    resolver: Arc<dyn Resolver>,
    fetcher: Arc<dyn Fetcher>,
    launcher: Arc<dyn PlayerLauncher>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl PlayerSession {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        fetcher: Arc<dyn Fetcher>,
        launcher: Arc<dyn PlayerLauncher>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::idle()),
                generation: AtomicU64::new(0),
                resolver,
                fetcher,
                launcher,
                events,
            }),
        };
        (session, receiver)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    /// Take the next place in line. Any request holding an older ticket is
    /// superseded from now on.
    pub fn reserve(&self) -> Ticket {
        Ticket(self.next_generation())
    }

    /// Resolve, optionally download, then start playing `request`.
    ///
    /// Not-found and download failures leave any current playback untouched.
    pub async fn play(&self, ticket: Ticket, request: PlaybackRequest) -> Result<PlayOutcome> {
        let Ticket(ticket) = ticket;

        // Overtaken while queued for a worker
        if self.is_stale(ticket) {
            tracing::debug!(track = ?request.track, "Discarding request superseded before it started");
            return Ok(PlayOutcome::Superseded);
        }

        let reference = match request.track {
            TrackQuery::Resolved(reference) => reference,
            TrackQuery::Text(query) => {
                self.emit(SessionEvent::Searching { query: query.clone() });
                match self.inner.resolver.resolve(&query).await {
                    Some(reference) => reference,
                    None => {
                        tracing::info!(query = %query, "Song not found");
                        self.emit(SessionEvent::NotFound { query: query.clone() });
                        return Err(PlayerError::NotFound { query });
                    }
                }
            }
        };

        // Skip the download when a newer request already took over
        if self.is_stale(ticket) {
            return Ok(self.superseded(reference));
        }

        let source = if request.offline {
            self.emit(SessionEvent::Downloading { reference: reference.clone() });
            match self.inner.fetcher.materialize(&reference).await {
                Ok(path) => PlaySource::Local(path),
                Err(e) => {
                    self.emit(SessionEvent::FetchFailed {
                        reference: reference.clone(),
                        reason: e.to_string(),
                    });
                    return Err(e);
                }
            }
        } else {
            PlaySource::Stream(reference.clone())
        };

        self.start(ticket, reference, source, request.volume, request.loop_enabled)
            .await
    }

    /// Play the entry popped from the front of the playlist. `None` (empty
    /// playlist) is a no-op that leaves the session untouched.
    pub async fn next(
        &self,
        ticket: Ticket,
        front: Option<TrackRef>,
        options: PlayOptions,
    ) -> Result<Option<PlayOutcome>> {
        let Some(reference) = front else {
            tracing::debug!("Next on empty playlist");
            return Ok(None);
        };

        let request = PlaybackRequest::new(TrackQuery::Resolved(reference), options.volume)
            .offline(options.offline)
            .looping(options.loop_enabled);
        self.play(ticket, request).await.map(Some)
    }

    /// Search for `query` without touching playback. Used when queueing
    /// free text onto the playlist.
    pub async fn resolve(&self, query: &str) -> Option<TrackRef> {
        self.emit(SessionEvent::Searching { query: query.to_string() });
        let found = self.inner.resolver.resolve(query).await;
        if found.is_none() {
            self.emit(SessionEvent::NotFound { query: query.to_string() });
        }
        found
    }

    /// Suspend the player, or resume it if it is already suspended
    pub async fn toggle_pause(&self) -> Result<PauseOutcome> {
        let mut state = self.inner.state.lock().await;
        let paused = state.paused;
        let Some(process) = state.process.as_mut() else {
            return Ok(PauseOutcome::Idle);
        };

        if paused {
            process.resume()?;
            state.paused = false;
            self.emit(SessionEvent::Resumed);
            Ok(PauseOutcome::Resumed)
        } else {
            process.suspend()?;
            state.paused = true;
            self.emit(SessionEvent::Paused);
            Ok(PauseOutcome::Paused)
        }
    }

    /// Kill playback, drop any pending loop and invalidate in-flight requests.
    /// Returns whether a process was running. Safe to call when idle.
    pub async fn stop(&self) -> bool {
        self.next_generation();
        let mut state = self.inner.state.lock().await;
        let was_playing = state.process.is_some();
        state.clear().await;
        if was_playing {
            tracing::info!("Playback stopped");
            self.emit(SessionEvent::Stopped);
        }
        was_playing
    }

    /// Turn looping on or off for the live session. Clearing it lets the
    /// current cycle finish and then stops.
    pub async fn set_loop(&self, enabled: bool) {
        let mut state = self.inner.state.lock().await;
        if state.loop_enabled != enabled {
            tracing::debug!(enabled, "Loop toggled");
        }
        state.loop_enabled = enabled;
    }

    fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) != ticket
    }

    fn superseded(&self, reference: TrackRef) -> PlayOutcome {
        tracing::debug!(reference = %reference, "Discarding superseded request");
        self.emit(SessionEvent::Superseded { reference });
        PlayOutcome::Superseded
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine (tests, shutdown)
        let _ = self.inner.events.send(event);
    }

    async fn start(
        &self,
        ticket: u64,
        reference: TrackRef,
        source: PlaySource,
        volume: u8,
        loop_enabled: bool,
    ) -> Result<PlayOutcome> {
        let mut state = self.inner.state.lock().await;

        if self.is_stale(ticket) {
            return Ok(self.superseded(reference));
        }

        if state.halt().await {
            tracing::debug!("Terminated previous player before starting a new one");
        }
        state.current = Some(reference.clone());
        state.source = Some(source.clone());
        state.volume = volume;
        state.loop_enabled = loop_enabled;
        state.loop_count = 0;

        match self.inner.launcher.launch(&source, volume).await {
            Ok(Launched { process, exited }) => {
                let token = state.install(process);
                drop(state);

                tracing::info!(reference = %reference, source = %source, volume, "Playing");
                self.emit(SessionEvent::Started {
                    reference: reference.clone(),
                    source,
                });
                self.supervise(token, exited);
                Ok(PlayOutcome::Started(reference))
            }
            Err(e) => {
                state.clear().await;
                tracing::error!(error = %e, reference = %reference, "Player launch failed");
                self.emit(SessionEvent::LaunchFailed { reason: e.to_string() });
                Err(e)
            }
        }
    }

    fn supervise(&self, token: u64, exited: oneshot::Receiver<()>) {
        let session = self.clone();
        tokio::spawn(async move {
            let (mut token, mut exited) = (token, exited);
            loop {
                // A dropped sender means the process is gone as well
                let _ = exited.await;
                match session.after_exit(token).await {
                    Some((next_token, next_exited)) => {
                        token = next_token;
                        exited = next_exited;
                    }
                    None => break,
                }
            }
        });
    }

    /// Handle a process exit. Returns the replacement process when looping.
    async fn after_exit(&self, token: u64) -> Option<(u64, oneshot::Receiver<()>)> {
        let mut state = self.inner.state.lock().await;

        // Killed by Stop or replaced by a newer Play
        if state.process_token != token || state.process.is_none() {
            return None;
        }

        state.process = None;
        state.playing = false;
        state.paused = false;
        let reference = state.current.clone()?;

        if !state.loop_enabled {
            tracing::info!(reference = %reference, loops = state.loop_count, "Track finished");
            self.emit(SessionEvent::Finished {
                reference,
                loops: state.loop_count,
            });
            return None;
        }

        let source = state.source.clone()?;
        let volume = state.volume;
        match self.inner.launcher.launch(&source, volume).await {
            Ok(Launched { process, exited }) => {
                state.loop_count += 1;
                let iteration = state.loop_count;
                let token = state.install(process);
                tracing::info!(reference = %reference, iteration, "Looping track");
                self.emit(SessionEvent::Replaying { reference, iteration });
                Some((token, exited))
            }
            Err(e) => {
                state.clear().await;
                tracing::error!(error = %e, reference = %reference, "Player relaunch failed");
                self.emit(SessionEvent::LaunchFailed { reason: e.to_string() });
                None
            }
        }
    }
}
