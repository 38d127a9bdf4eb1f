//! Events published by the player session

use crate::model::{PlaySource, TrackRef};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Searching { query: String },
    NotFound { query: String },
    Downloading { reference: TrackRef },
    FetchFailed { reference: TrackRef, reason: String },
    Started { reference: TrackRef, source: PlaySource },
    Replaying { reference: TrackRef, iteration: u32 },
    Finished { reference: TrackRef, loops: u32 },
    Paused,
    Resumed,
    Stopped,
    LaunchFailed { reason: String },
    /// A newer Play/Stop/Next arrived while this request was still working
    Superseded { reference: TrackRef },
}

impl SessionEvent {
    /// One line for the status panel
    pub fn status_line(&self) -> String {
        match self {
            Self::Searching { query } => format!("Searching for {query}..."),
            Self::NotFound { .. } => "Song not found, please try again.".to_string(),
            Self::Downloading { reference } => format!("Downloading {reference}..."),
            Self::FetchFailed { reason, .. } => format!("Download failed: {reason}"),
            Self::Started { reference, .. } => format!("Playing: {reference}"),
            Self::Replaying { reference, iteration } => format!("Looping ({iteration}): {reference}"),
            Self::Finished { reference, .. } => format!("Finished: {reference}"),
            Self::Paused => "Paused".to_string(),
            Self::Resumed => "Resumed".to_string(),
            Self::Stopped => "Stopped".to_string(),
            Self::LaunchFailed { reason } => format!("Could not start player: {reason}"),
            Self::Superseded { reference } => format!("Dropped stale request for {reference}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::LaunchFailed { .. })
    }
}
