//! Track references and playback requests

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Opaque reference (URL) to a remotely playable item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Reference for a bare provider video id
    pub fn from_video_id(id: &str) -> Self {
        Self(format!("{WATCH_URL_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether free text typed by the user already is a reference
    pub fn looks_like_reference(text: &str) -> bool {
        let text = text.trim();
        text.starts_with("https://") || text.starts_with("http://")
    }

    /// Provider item id used to name cached downloads.
    ///
    /// Understands `watch?v=<id>`, `youtu.be/<id>` and `/shorts/<id>`; anything
    /// else becomes a filesystem-safe slug of the whole reference so the name
    /// stays deterministic.
    pub fn item_id(&self) -> String {
        let reference = self.0.trim();

        if let Some(query) = reference.split_once('?').map(|(_, q)| q) {
            let id = query
                .split('&')
                .find_map(|pair| pair.strip_prefix("v="))
                .map(|v| v.split('#').next().unwrap_or(v));
            if let Some(id) = id.filter(|id| is_plain_id(id)) {
                return id.to_string();
            }
        }

        for marker in ["youtu.be/", "/shorts/"] {
            if let Some((_, rest)) = reference.split_once(marker) {
                let id = rest.split(['?', '&', '/', '#']).next().unwrap_or_default();
                if is_plain_id(id) {
                    return id.to_string();
                }
            }
        }

        slug(reference)
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn slug(reference: &str) -> String {
    let without_scheme = reference
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(reference);
    let slug: String = without_scheme
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if slug.is_empty() { "track".to_string() } else { slug }
}

/// What the user asked to play
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackQuery {
    /// Free text that still needs a search
    Text(String),
    /// Already resolved, e.g. popped from the playlist
    Resolved(TrackRef),
}

impl TrackQuery {
    /// Interpret form text: URLs are taken as-is, everything else is searched
    pub fn from_input(input: &str) -> Self {
        if TrackRef::looks_like_reference(input) {
            Self::Resolved(TrackRef::new(input.trim()))
        } else {
            Self::Text(input.to_string())
        }
    }
}

impl fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Resolved(reference) => reference.fmt(f),
        }
    }
}

/// One Play action with the form values at the time it was issued
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub track: TrackQuery,
    pub volume: u8,
    pub offline: bool,
    pub loop_enabled: bool,
}

impl PlaybackRequest {
    pub fn new(track: TrackQuery, volume: u8) -> Self {
        Self {
            track,
            volume: volume.min(100),
            offline: false,
            loop_enabled: false,
        }
    }

    #[must_use]
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    #[must_use]
    pub fn looping(mut self, loop_enabled: bool) -> Self {
        self.loop_enabled = loop_enabled;
        self
    }
}

/// What the external player is pointed at
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaySource {
    Stream(TrackRef),
    Local(PathBuf),
}

impl PlaySource {
    pub fn as_arg(&self) -> &OsStr {
        match self {
            Self::Stream(reference) => OsStr::new(reference.as_str()),
            Self::Local(path) => path.as_os_str(),
        }
    }
}

impl fmt::Display for PlaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(reference) => reference.fmt(f),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
