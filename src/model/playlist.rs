//! Ordered queue of track references; the front is played next

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::track::TrackRef;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    entries: VecDeque<TrackRef>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reference: TrackRef) {
        self.entries.push_back(reference);
    }

    pub fn pop_front(&mut self) -> Option<TrackRef> {
        self.entries.pop_front()
    }

    pub fn remove(&mut self, index: usize) -> Option<TrackRef> {
        self.entries.remove(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.entries.iter()
    }
}

impl FromIterator<TrackRef> for Playlist {
    fn from_iter<I: IntoIterator<Item = TrackRef>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
