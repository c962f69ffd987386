use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use course_core::model::{CompletionMap, Course, CourseId, Question, Quiz, QuizId, QuizResult, VideoId};

/// Errors surfaced by backend collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Course catalog: the playlist a learner is enrolled in.
#[async_trait]
pub trait CourseApi: Send + Sync {
    /// Fetch a course with its ordered video list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown course, or other API errors.
    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError>;
}

/// Enrollment/progress service: the authoritative per-video completion map.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Fetch the learner's completion map for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the status cannot be fetched.
    async fn completion_status(&self, course_id: &CourseId) -> Result<CompletionMap, ApiError>;

    /// Record a video completion; returns the authoritative post-update map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the completion cannot be recorded. The caller
    /// must not update local state on failure.
    async fn mark_complete(
        &self,
        course_id: &CourseId,
        video_id: &VideoId,
    ) -> Result<CompletionMap, ApiError>;
}

/// Quiz store: persisted section quizzes and their outcomes.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// List every quiz the learner has for this course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the list cannot be fetched.
    async fn list_quizzes(&self, course_id: &CourseId) -> Result<Vec<Quiz>, ApiError>;

    /// Persist a freshly generated quiz for a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the quiz cannot be stored.
    async fn save_quiz(
        &self,
        course_id: &CourseId,
        section_index: usize,
        questions: &[Question],
    ) -> Result<Quiz, ApiError>;

    /// Persist a graded attempt; returns the updated quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown quiz id, or other API errors.
    async fn submit_result(&self, quiz_id: &QuizId, result: QuizResult) -> Result<Quiz, ApiError>;
}

/// Free-text generation collaborator. No output schema is guaranteed; callers
/// must parse defensively.
#[async_trait]
pub trait TextGenerationApi: Send + Sync {
    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the provider request fails.
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Certificate eligibility as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateDetails {
    pub learner_name: String,
    pub course_name: String,
    pub eligible: bool,
    pub completion_percent: f64,
}

/// A certificate issuance to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateRecord {
    pub course_id: CourseId,
    pub certificate_url: String,
    pub learner_name: String,
    pub course_name: String,
    pub completion_percent: f64,
    pub issued_at: DateTime<Utc>,
}

/// Certificate service.
#[async_trait]
pub trait CertificateApi: Send + Sync {
    /// Fetch the learner's certificate eligibility for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if eligibility cannot be fetched.
    async fn eligibility(&self, course_id: &CourseId) -> Result<CertificateDetails, ApiError>;

    /// Persist an issued certificate.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the record cannot be stored.
    async fn save_certificate(&self, record: &CertificateRecord) -> Result<(), ApiError>;
}
