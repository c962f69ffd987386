use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{CourseId, VideoId};
use crate::model::video::LessonVideo;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("duplicate video id in course: {id}")]
    DuplicateVideo { id: VideoId },
}

/// A course: an ordered playlist of lesson videos.
///
/// Video order is load-bearing: sectioning, locking, and auto-advance are all
/// defined over the index of a video in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    videos: Vec<LessonVideo>,
}

impl Course {
    /// Create a course from an ordered video list.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank, or
    /// `CourseError::DuplicateVideo` if two videos share an id.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        videos: Vec<LessonVideo>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut seen: HashSet<&VideoId> = HashSet::with_capacity(videos.len());
        for video in &videos {
            if !seen.insert(video.id()) {
                return Err(CourseError::DuplicateVideo {
                    id: video.id().clone(),
                });
            }
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            videos,
        })
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn videos(&self) -> &[LessonVideo] {
        &self.videos
    }

    #[must_use]
    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    /// Position of a video in the flat ordered list.
    #[must_use]
    pub fn index_of(&self, video_id: &VideoId) -> Option<usize> {
        self.videos.iter().position(|video| video.id() == video_id)
    }

    #[must_use]
    pub fn video_at(&self, index: usize) -> Option<&LessonVideo> {
        self.videos.get(index)
    }
}
