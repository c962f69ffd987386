//! In-memory backend for tests and prototyping.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use course_core::model::{
    CompletionMap, Course, CourseId, Question, Quiz, QuizId, QuizResult, VideoId,
};
use course_core::progress;

use crate::contracts::{
    ApiError, CertificateApi, CertificateDetails, CertificateRecord, CourseApi, ProgressApi,
    QuizApi, TextGenerationApi,
};

#[derive(Default)]
struct BackendState {
    courses: HashMap<CourseId, Course>,
    completion: HashMap<CourseId, HashMap<VideoId, bool>>,
    quizzes: HashMap<CourseId, Vec<Quiz>>,
    generation: VecDeque<String>,
    certificates: Vec<CertificateRecord>,
    learner_name: String,
    next_quiz_id: u64,
    fail_mark_complete: bool,
}

/// Backend double implementing every collaborator trait over shared in-memory
/// state. Generation responses are scripted with [`InMemoryBackend::push_generation`];
/// an empty script makes the generator fail, which is how tests exercise the
/// synthetic-quiz fallback.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState {
                learner_name: "Test Learner".into(),
                next_quiz_id: 1,
                ..BackendState::default()
            })),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BackendState>, ApiError> {
        self.state
            .lock()
            .map_err(|err| ApiError::Connection(err.to_string()))
    }

    /// Register a course the backend should serve.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    pub fn insert_course(&self, course: Course) {
        let mut state = self.state.lock().expect("state lock");
        state.courses.insert(course.id().clone(), course);
    }

    /// Seed the learner's completion map for a course.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    pub fn seed_completion(&self, course_id: &CourseId, completed: &[VideoId]) {
        let mut state = self.state.lock().expect("state lock");
        let entry = state.completion.entry(course_id.clone()).or_default();
        for video in completed {
            entry.insert(video.clone(), true);
        }
    }

    /// Queue the next generation response.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    pub fn push_generation(&self, content: impl Into<String>) {
        let mut state = self.state.lock().expect("state lock");
        state.generation.push_back(content.into());
    }

    /// Make subsequent `mark_complete` calls fail.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    pub fn set_fail_mark_complete(&self, fail: bool) {
        let mut state = self.state.lock().expect("state lock");
        state.fail_mark_complete = fail;
    }

    /// Quizzes persisted for a course, in save order.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    #[must_use]
    pub fn saved_quizzes(&self, course_id: &CourseId) -> Vec<Quiz> {
        let state = self.state.lock().expect("state lock");
        state.quizzes.get(course_id).cloned().unwrap_or_default()
    }

    /// Certificates persisted so far.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; test-setup only.
    #[must_use]
    pub fn saved_certificates(&self) -> Vec<CertificateRecord> {
        let state = self.state.lock().expect("state lock");
        state.certificates.clone()
    }
}

#[async_trait]
impl CourseApi for InMemoryBackend {
    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError> {
        let state = self.lock()?;
        state
            .courses
            .get(course_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl ProgressApi for InMemoryBackend {
    async fn completion_status(&self, course_id: &CourseId) -> Result<CompletionMap, ApiError> {
        let state = self.lock()?;
        let entries = state.completion.get(course_id).cloned().unwrap_or_default();
        Ok(CompletionMap::from_entries(entries))
    }

    async fn mark_complete(
        &self,
        course_id: &CourseId,
        video_id: &VideoId,
    ) -> Result<CompletionMap, ApiError> {
        let mut state = self.lock()?;
        if state.fail_mark_complete {
            return Err(ApiError::Connection("simulated outage".into()));
        }
        if !state.courses.contains_key(course_id) {
            return Err(ApiError::NotFound);
        }
        let entry = state.completion.entry(course_id.clone()).or_default();
        entry.insert(video_id.clone(), true);
        Ok(CompletionMap::from_entries(entry.clone()))
    }
}

#[async_trait]
impl QuizApi for InMemoryBackend {
    async fn list_quizzes(&self, course_id: &CourseId) -> Result<Vec<Quiz>, ApiError> {
        let state = self.lock()?;
        Ok(state.quizzes.get(course_id).cloned().unwrap_or_default())
    }

    async fn save_quiz(
        &self,
        course_id: &CourseId,
        section_index: usize,
        questions: &[Question],
    ) -> Result<Quiz, ApiError> {
        let mut state = self.lock()?;
        let id = QuizId::new(format!("quiz-{}", state.next_quiz_id));
        state.next_quiz_id += 1;

        let quiz = Quiz::new(id, section_index, questions.to_vec())
            .map_err(|err| ApiError::Malformed(err.to_string()))?;
        state
            .quizzes
            .entry(course_id.clone())
            .or_default()
            .push(quiz.clone());
        Ok(quiz)
    }

    async fn submit_result(&self, quiz_id: &QuizId, result: QuizResult) -> Result<Quiz, ApiError> {
        let mut state = self.lock()?;
        for quizzes in state.quizzes.values_mut() {
            if let Some(quiz) = quizzes.iter_mut().find(|quiz| quiz.id() == quiz_id) {
                quiz.record_outcome(result);
                return Ok(quiz.clone());
            }
        }
        Err(ApiError::NotFound)
    }
}

#[async_trait]
impl TextGenerationApi for InMemoryBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
        let mut state = self.lock()?;
        state
            .generation
            .pop_front()
            .ok_or_else(|| ApiError::Connection("no generation response scripted".into()))
    }
}

#[async_trait]
impl CertificateApi for InMemoryBackend {
    async fn eligibility(&self, course_id: &CourseId) -> Result<CertificateDetails, ApiError> {
        let state = self.lock()?;
        let course = state.courses.get(course_id).ok_or(ApiError::NotFound)?;
        let completion = CompletionMap::from_entries(
            state.completion.get(course_id).cloned().unwrap_or_default(),
        );
        let percent = progress::completion_percent(course, &completion);
        Ok(CertificateDetails {
            learner_name: state.learner_name.clone(),
            course_name: course.title().to_owned(),
            eligible: progress::certificate_eligible(percent),
            completion_percent: percent,
        })
    }

    async fn save_certificate(&self, record: &CertificateRecord) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        state.certificates.push(record.clone());
        Ok(())
    }
}
