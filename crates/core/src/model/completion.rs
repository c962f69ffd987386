use std::collections::HashMap;

use crate::model::ids::VideoId;
use crate::model::video::LessonVideo;

/// Per-video completion status for one learner on one course.
///
/// The server owns the authoritative copy; this is the client's cache of it.
/// Every sync wholesale replaces the cache with the server's map, so there is
/// no local merge logic to get wrong and `mark_complete` stays idempotent.
/// Entries are created the first time a video completes and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMap {
    entries: HashMap<VideoId, bool>,
}

impl CompletionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: HashMap<VideoId, bool>) -> Self {
        Self { entries }
    }

    /// Replace the cache with the server's authoritative map.
    pub fn replace(&mut self, other: CompletionMap) {
        self.entries = other.entries;
    }

    #[must_use]
    pub fn is_complete(&self, video_id: &VideoId) -> bool {
        self.entries.get(video_id).copied().unwrap_or(false)
    }

    /// Number of videos recorded as complete.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|done| **done).count()
    }

    /// True when every listed video is complete.
    ///
    /// An empty slice is vacuously complete; callers gate on section
    /// membership before asking.
    #[must_use]
    pub fn all_complete(&self, videos: &[LessonVideo]) -> bool {
        videos.iter().all(|video| self.is_complete(video.id()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
