mod completion;
mod course;
mod ids;
mod quiz;
pub mod section;
mod video;

pub use completion::CompletionMap;
pub use course::{Course, CourseError};
pub use ids::{CourseId, QuizId, VideoId};
pub use quiz::{
    OPTIONS_PER_QUESTION, PASS_PERCENT, QUESTIONS_PER_QUIZ, Question, Quiz, QuizAttempt,
    QuizError, QuizResult,
};
pub use section::{
    SECTION_SIZE, is_section_locked, section_count, section_of_video, section_video_range,
};
pub use video::{LessonVideo, VideoError};
