//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use course_core::model::{QuizError, VideoId};

/// Errors emitted by the course player and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("section {index} does not exist in this course")]
    UnknownSection { index: usize },

    #[error("section {index} is locked; pass the previous section's test to unlock it")]
    SectionLocked { index: usize },

    #[error("complete all videos in section {index} before taking its test")]
    SectionIncomplete { index: usize },

    #[error("video is not part of this course: {id}")]
    UnknownVideo { id: VideoId },

    #[error("no quiz exists for section {index}")]
    NoQuizForSection { index: usize },

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `CertificateService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertificateError {
    #[error("course completion is below the certificate threshold")]
    NotEligible,

    #[error(transparent)]
    Api(#[from] ApiError),
}
