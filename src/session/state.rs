//! Session state record and the values the session hands back

use crate::media::PlayerProcess;
use crate::model::{PlaySource, TrackRef};

/// The single record of what is playing. Lives behind the session mutex.
///
/// Invariant: `process.is_some() == playing`.
pub(super) struct SessionState {
    pub current: Option<TrackRef>,
    pub source: Option<PlaySource>,
    pub volume: u8,
    pub playing: bool,
    pub paused: bool,
    pub loop_enabled: bool,
    pub loop_count: u32,
    pub process: Option<Box<dyn PlayerProcess>>,
    /// Identifies the live process; supervisors holding an older value are stale
    pub process_token: u64,
}

impl SessionState {
    pub fn idle() -> Self {
        Self {
            current: None,
            source: None,
            volume: 0,
            playing: false,
            paused: false,
            loop_enabled: false,
            loop_count: 0,
            process: None,
            process_token: 0,
        }
    }

    /// Kill the live process if there is one and wait for it to exit.
    /// Returns whether one was killed.
    pub async fn halt(&mut self) -> bool {
        let killed = match self.process.take() {
            Some(mut process) => {
                process.terminate().await;
                true
            }
            None => false,
        };
        self.playing = false;
        self.paused = false;
        killed
    }

    /// Back to the start-up shape, keeping only the loop flag
    pub async fn clear(&mut self) {
        self.halt().await;
        self.current = None;
        self.source = None;
        self.loop_count = 0;
    }

    pub fn install(&mut self, process: Box<dyn PlayerProcess>) -> u64 {
        self.process_token += 1;
        self.process = Some(process);
        self.playing = true;
        self.paused = false;
        self.process_token
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        debug_assert_eq!(self.playing, self.process.is_some());
        SessionSnapshot {
            current: self.current.clone(),
            playing: self.playing,
            paused: self.paused,
            loop_enabled: self.loop_enabled,
            loop_count: self.loop_count,
        }
    }
}

/// Read-only copy of the session state for display and tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current: Option<TrackRef>,
    pub playing: bool,
    pub paused: bool,
    pub loop_enabled: bool,
    pub loop_count: u32,
}

impl SessionSnapshot {
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        !self.playing
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started(TrackRef),
    /// A newer request took over before this one reached the player
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseOutcome {
    /// Nothing is playing, nothing was signalled
    Idle,
    Paused,
    Resumed,
}

/// Form values that apply to a Next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayOptions {
    pub volume: u8,
    pub offline: bool,
    pub loop_enabled: bool,
}
