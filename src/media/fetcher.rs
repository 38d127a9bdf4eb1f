//! Offline mode: download audio into the cache directory with yt-dlp

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{PlayerError, Result};
use crate::model::TrackRef;
use super::Fetcher;

pub const AUDIO_EXTENSION: &str = "mp3";

pub struct YtDlpFetcher {
    program: String,
    cache_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Where the audio for `reference` lands. Named by provider item id, so a
    /// second download of the same track overwrites the first.
    pub fn cached_path(&self, reference: &TrackRef) -> PathBuf {
        cached_path(&self.cache_dir, reference)
    }

    async fn download(&self, reference: &TrackRef) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| self.failure(reference, format!("cache dir: {e}")))?;

        let target = self.cached_path(reference);
        let template = self.cache_dir.join(format!("{}.%(ext)s", reference.item_id()));

        tracing::info!(reference = %reference, target = %target.display(), "Downloading audio");

        let output = Command::new(&self.program)
            .args(["-f", "bestaudio", "-x", "--audio-format", AUDIO_EXTENSION])
            .args(["--force-overwrites", "--no-playlist", "--no-warnings", "-o"])
            .arg(&template)
            .arg(reference.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.failure(reference, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(reference, format!("exit {}: {}", output.status, stderr.trim())));
        }

        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(self.failure(reference, format!("{} was not created", target.display())));
        }

        Ok(target)
    }

    fn failure(&self, reference: &TrackRef, reason: String) -> PlayerError {
        PlayerError::FetchFailed {
            reference: reference.to_string(),
            reason: format!("{}: {reason}", self.program),
        }
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    async fn materialize(&self, reference: &TrackRef) -> Result<PathBuf> {
        let result = self.download(reference).await;
        crate::log_tool_result!("download", result);
        result
    }
}

fn cached_path(cache_dir: &Path, reference: &TrackRef) -> PathBuf {
    cache_dir.join(format!("{}.{AUDIO_EXTENSION}", reference.item_id()))
}
