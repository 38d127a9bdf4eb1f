//! Media adapters - the external tools behind the player session
//!
//! - `resolver`: text query → track reference (yt-dlp search)
//! - `fetcher`: track reference → cached local audio file (yt-dlp download)
//! - `player`: launching and signalling the external player (mpv)
//!
//! The session only talks to the traits below, so tests swap in doubles.

mod fetcher;
mod player;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::oneshot;

use crate::error::Result;
use crate::model::{PlaySource, TrackRef};

pub use fetcher::YtDlpFetcher;
pub use player::MpvLauncher;
pub use resolver::YtDlpResolver;

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Top-ranked reference for `query`, or `None` when nothing matched or the
    /// search itself failed (failures are logged, never returned).
    async fn resolve(&self, query: &str) -> Option<TrackRef>;
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download best audio for `reference` into the cache, returning its path
    async fn materialize(&self, reference: &TrackRef) -> Result<PathBuf>;
}

#[async_trait]
pub trait PlayerLauncher: Send + Sync {
    async fn launch(&self, source: &PlaySource, volume: u8) -> Result<Launched>;
}

/// Control over exactly one spawned player process
#[async_trait]
pub trait PlayerProcess: Send {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
    /// Kill the process and return once it is gone. Calling it again after
    /// the process is gone is a no-op.
    async fn terminate(&mut self);
}

/// A freshly launched player: its control handle plus a signal that fires
/// (or is dropped) once the process has exited.
pub struct Launched {
    pub process: Box<dyn PlayerProcess>,
    pub exited: oneshot::Receiver<()>,
}
