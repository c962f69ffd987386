use std::sync::Arc;

use api::{ApiError, CourseApi, ProgressApi, QuizApi, TextGenerationApi};
use course_core::Clock;
use course_core::model::{
    CourseId, LessonVideo, QUESTIONS_PER_QUIZ, Question, Quiz, QuizAttempt, QuizResult, VideoId,
    section_of_video, section_video_range,
};

use crate::error::PlayerError;
use crate::quiz_gen;
use super::state::CoursePlayer;

/// Result of reporting a video completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkCompleteOutcome {
    /// Section containing the completed video.
    pub section_index: usize,
    /// True when that section's videos are now all complete.
    pub section_completed: bool,
    /// Video auto-advanced to, when the next video was open.
    pub advanced_to: Option<VideoId>,
}

/// Orchestrates the course player against the backend collaborators.
#[derive(Clone)]
pub struct CourseProgressService {
    clock: Clock,
    courses: Arc<dyn CourseApi>,
    progress: Arc<dyn ProgressApi>,
    quizzes: Arc<dyn QuizApi>,
    generation: Arc<dyn TextGenerationApi>,
}

impl CourseProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseApi>,
        progress: Arc<dyn ProgressApi>,
        quizzes: Arc<dyn QuizApi>,
        generation: Arc<dyn TextGenerationApi>,
    ) -> Self {
        Self {
            clock,
            courses,
            progress,
            quizzes,
            generation,
        }
    }

    /// Load a course and the learner's state for it.
    ///
    /// A failed quiz listing degrades to "no quizzes yet" so the player still
    /// opens; course and completion fetches are required.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Api` when the course or completion status cannot
    /// be fetched.
    pub async fn load(&self, course_id: &CourseId) -> Result<CoursePlayer, PlayerError> {
        let course = self.courses.get_course(course_id).await?;
        let completion = self.progress.completion_status(course_id).await?;
        let quizzes = match self.quizzes.list_quizzes(course_id).await {
            Ok(quizzes) => quizzes,
            Err(err) => {
                tracing::warn!(course_id = %course_id, %err, "quiz list unavailable, starting without");
                Vec::new()
            }
        };

        Ok(CoursePlayer::new(
            course,
            completion,
            quizzes,
            self.clock.now(),
        ))
    }

    /// Report a video completion and sync the authoritative map back.
    ///
    /// Idempotent: re-reporting an already-complete video replaces the cache
    /// with the same server map. On backend failure nothing changes locally;
    /// the learner retries by re-watching (fail-closed).
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::UnknownVideo` for a video outside the course and
    /// `PlayerError::Api` when the backend rejects the completion.
    pub async fn mark_complete(
        &self,
        player: &mut CoursePlayer,
        video_id: &VideoId,
    ) -> Result<MarkCompleteOutcome, PlayerError> {
        let index = player
            .course()
            .index_of(video_id)
            .ok_or_else(|| PlayerError::UnknownVideo {
                id: video_id.clone(),
            })?;
        let section_index = section_of_video(index);

        let map = match self
            .progress
            .mark_complete(player.course().id(), video_id)
            .await
        {
            Ok(map) => map,
            Err(err) => {
                tracing::error!(video_id = %video_id, %err, "failed to record video completion");
                return Err(err.into());
            }
        };

        player.apply_completion(map);
        let section_completed = player.section_complete(section_index);
        let advanced_to = player.advance_after(video_id);

        Ok(MarkCompleteOutcome {
            section_index,
            section_completed,
            advanced_to,
        })
    }

    /// Fetch or generate the quiz for a section.
    ///
    /// Requires every video of the section to be complete. An existing quiz
    /// is returned as-is; otherwise one is generated from the section's video
    /// titles, parsed, normalized to ten questions, persisted, and cached.
    /// Generation or parsing failures substitute the synthetic fallback set
    /// so the learner is never blocked (fail-open); only the persistence call
    /// can still fail the operation.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::UnknownSection` for an out-of-range index,
    /// `PlayerError::SectionIncomplete` when videos are missing, and
    /// `PlayerError::Api` when the generated quiz cannot be persisted.
    pub async fn take_test(
        &self,
        player: &mut CoursePlayer,
        section_index: usize,
    ) -> Result<Quiz, PlayerError> {
        if section_index >= player.section_count() {
            return Err(PlayerError::UnknownSection {
                index: section_index,
            });
        }
        if !player.section_complete(section_index) {
            return Err(PlayerError::SectionIncomplete {
                index: section_index,
            });
        }

        // Quizzes are generated at most once per section.
        if let Some(existing) = player.quiz_for_section(section_index) {
            return Ok(existing.clone());
        }

        player.set_generating(true);
        let result = self.generate_and_save(player, section_index).await;
        player.set_generating(false);
        result
    }

    async fn generate_and_save(
        &self,
        player: &mut CoursePlayer,
        section_index: usize,
    ) -> Result<Quiz, PlayerError> {
        let range = section_video_range(section_index, player.course().video_count());
        let videos = &player.course().videos()[range];

        let questions = match self.generate_questions(videos).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(
                    section_index,
                    %err,
                    "quiz generation failed, substituting synthetic questions"
                );
                quiz_gen::fallback_questions(QUESTIONS_PER_QUIZ)
            }
        };

        let quiz = self
            .quizzes
            .save_quiz(player.course().id(), section_index, &questions)
            .await?;
        player.record_quiz(quiz.clone());
        Ok(quiz)
    }

    async fn generate_questions(
        &self,
        videos: &[LessonVideo],
    ) -> Result<Vec<Question>, ApiError> {
        let prompt = quiz_gen::section_prompt(videos);
        let content = self.generation.generate(&prompt).await?;
        Ok(quiz_gen::normalize_questions(quiz_gen::parse_quiz_text(
            &content,
        )))
    }

    /// Grade an attempt client-side, persist the outcome, and update state.
    ///
    /// The displayed result comes from the local grade; the backend only
    /// persists it. A passing grade adds the section to the pass history,
    /// unlocking the next section immediately.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::NoQuizForSection` when the section has no loaded
    /// quiz, and `PlayerError::Api` when the backend rejects the submission
    /// (in which case the pass history is untouched).
    pub async fn submit_quiz(
        &self,
        player: &mut CoursePlayer,
        section_index: usize,
        attempt: &QuizAttempt,
    ) -> Result<QuizResult, PlayerError> {
        let quiz = player
            .quiz_for_section(section_index)
            .ok_or(PlayerError::NoQuizForSection {
                index: section_index,
            })?;
        let result = quiz.grade(attempt);
        let quiz_id = quiz.id().clone();

        let persisted = match self.quizzes.submit_result(&quiz_id, result).await {
            Ok(quiz) => quiz,
            Err(err) => {
                tracing::error!(quiz_id = %quiz_id, %err, "failed to persist quiz result");
                return Err(err.into());
            }
        };

        player.apply_submitted(persisted);
        Ok(result)
    }
}
