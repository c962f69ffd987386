use crate::model::VideoId;

/// Share of a video's duration that must be watched before it counts as
/// complete.
pub const COMPLETION_THRESHOLD: f64 = 0.95;

/// Snapshot of the playback surface's state for the active video.
///
/// The controller only consumes these signals; it does not drive playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackProgress {
    pub position_secs: f64,
    pub duration_secs: f64,
    pub playing: bool,
}

impl PlaybackProgress {
    /// Watched fraction in [0, 1]; zero while the duration is unknown.
    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

/// Latches the one-shot completion signal for the active video.
///
/// A video completes the first time its watched fraction reaches
/// [`COMPLETION_THRESHOLD`]; later progress reports for the same video never
/// fire again. Switching videos re-arms the latch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackTracker {
    video: Option<VideoId>,
    fired: bool,
}

impl PlaybackTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm the tracker for a newly selected video.
    pub fn reset(&mut self, video: VideoId) {
        self.video = Some(video);
        self.fired = false;
    }

    #[must_use]
    pub fn video(&self) -> Option<&VideoId> {
        self.video.as_ref()
    }

    /// Feed a progress report; returns the completed video exactly once,
    /// at the moment the threshold is first reached.
    pub fn observe(&mut self, progress: PlaybackProgress) -> Option<VideoId> {
        if self.fired || progress.completion_ratio() < COMPLETION_THRESHOLD {
            return None;
        }
        let video = self.video.clone()?;
        self.fired = true;
        Some(video)
    }
}
