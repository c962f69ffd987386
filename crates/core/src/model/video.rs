use thiserror::Error;

use crate::model::ids::VideoId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VideoError {
    #[error("video title cannot be empty")]
    EmptyTitle,
}

/// A single lesson video inside a course.
///
/// Ordinal position is implicit: a video's place in the course is its index
/// in the course's video list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonVideo {
    id: VideoId,
    title: String,
    description: String,
}

impl LessonVideo {
    /// Create a lesson video.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::EmptyTitle` if the title is blank.
    pub fn new(
        id: VideoId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, VideoError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(VideoError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &VideoId {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_title() {
        let err = LessonVideo::new(VideoId::new("v1"), "   ", "desc").unwrap_err();
        assert!(matches!(err, VideoError::EmptyTitle));
    }

    #[test]
    fn exposes_fields() {
        let video = LessonVideo::new(VideoId::new("v1"), "Intro", "First lesson").unwrap();
        assert_eq!(video.id().as_str(), "v1");
        assert_eq!(video.title(), "Intro");
        assert_eq!(video.description(), "First lesson");
    }
}
