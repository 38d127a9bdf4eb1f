//! yt-dlp backed search

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{PlayerError, Result};
use crate::model::TrackRef;
use super::Resolver;

/// One line of `yt-dlp --dump-json --flat-playlist` output
#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    webpage_url: Option<String>,
}

impl SearchEntry {
    fn reference(&self) -> Option<TrackRef> {
        let is_url = |s: &&String| TrackRef::looks_like_reference(s);
        self.webpage_url
            .as_ref()
            .filter(is_url)
            .or_else(|| self.url.as_ref().filter(is_url))
            .map(|url| TrackRef::new(url.clone()))
            .or_else(|| {
                self.id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .map(TrackRef::from_video_id)
            })
    }
}

pub struct YtDlpResolver {
    program: String,
}

impl YtDlpResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    async fn search(&self, query: &str) -> Result<Option<TrackRef>> {
        tracing::debug!(query, "Searching");

        let output = Command::new(&self.program)
            .arg(format!("ytsearch1:{query}"))
            .args(["--flat-playlist", "--dump-json", "--no-warnings"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlayerError::SearchFailed {
                query: query.to_string(),
                reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        Ok(parse_search_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[async_trait]
impl Resolver for YtDlpResolver {
    async fn resolve(&self, query: &str) -> Option<TrackRef> {
        if query.trim().is_empty() {
            tracing::debug!("Empty query, nothing to search");
            return None;
        }

        let result = self.search(query).await;
        crate::log_tool_result!("search", result);

        match result {
            Ok(Some(reference)) => {
                tracing::info!(query, reference = %reference, "Resolved query");
                Some(reference)
            }
            Ok(None) => {
                tracing::info!(query, "Search returned no results");
                None
            }
            Err(_) => None,
        }
    }
}

/// First usable entry of newline-delimited yt-dlp JSON
fn parse_search_output(stdout: &str) -> Option<TrackRef> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<SearchEntry>(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unparsable search line");
                None
            }
        })
        .find_map(|entry| {
            let reference = entry.reference();
            if let (Some(reference), Some(title)) = (&reference, &entry.title) {
                tracing::debug!(title = %title, reference = %reference, "Top search result");
            }
            reference
        })
}
