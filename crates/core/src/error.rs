use thiserror::Error;

use crate::model::{CourseError, QuizError, VideoError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
