use std::sync::Arc;

use api::{ApiError, InMemoryBackend, QuizApi};
use async_trait::async_trait;
use course_core::model::{
    Course, CourseId, LessonVideo, Question, Quiz, QuizAttempt, QuizId, QuizResult, VideoId,
};
use course_core::time::fixed_clock;
use services::{AppServices, PlayerError};

fn build_course(video_count: usize) -> Course {
    let videos = (0..video_count)
        .map(|index| {
            LessonVideo::new(
                VideoId::new(format!("v{index}")),
                format!("Lesson {index}"),
                "",
            )
            .unwrap()
        })
        .collect();
    Course::new(CourseId::new("course-1"), "Rust Basics", "", videos).unwrap()
}

fn services_over(backend: &InMemoryBackend) -> AppServices {
    AppServices::with_backends(
        fixed_clock(),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
    )
}

/// Attempt with exactly `correct` right answers on the given quiz.
fn attempt_with_correct(quiz: &Quiz, correct: usize) -> QuizAttempt {
    let mut attempt = QuizAttempt::new();
    for (index, question) in quiz.questions().iter().enumerate() {
        if index < correct {
            attempt.select(index, question.correct_answer());
        } else {
            attempt.select(index, (question.correct_answer() + 1) % 4);
        }
    }
    attempt
}

#[tokio::test]
async fn full_gating_flow_unlocks_sections_in_order() {
    let backend = InMemoryBackend::new();
    backend.insert_course(build_course(12));
    let services = services_over(&backend);
    let progress = services.course_progress();
    let course_id = CourseId::new("course-1");

    let mut player = progress.load(&course_id).await.unwrap();

    // 12 videos partition into [5, 5, 2]; only section 0 starts open.
    let views = player.section_views();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0].videos, 0..5);
    assert_eq!(views[2].videos, 10..12);
    assert!(!views[0].locked);
    assert!(views[1].locked);
    assert!(views[2].locked);
    assert_eq!(player.selected_video().unwrap().id().as_str(), "v0");

    // The test is rejected until every section video is complete.
    let err = progress.take_test(&mut player, 0).await.unwrap_err();
    assert!(matches!(err, PlayerError::SectionIncomplete { index: 0 }));

    // Watch section 0; completion auto-advances within the section.
    for index in 0..5 {
        let video = VideoId::new(format!("v{index}"));
        let outcome = progress.mark_complete(&mut player, &video).await.unwrap();
        assert_eq!(outcome.section_index, 0);
        if index < 4 {
            assert_eq!(
                outcome.advanced_to,
                Some(VideoId::new(format!("v{}", index + 1)))
            );
            assert!(!outcome.section_completed);
        } else {
            // No auto-advance across the lock boundary.
            assert_eq!(outcome.advanced_to, None);
            assert!(outcome.section_completed);
        }
    }

    // Take the section test (generation script empty, synthetic fallback).
    let quiz = progress.take_test(&mut player, 0).await.unwrap();
    assert_eq!(quiz.questions().len(), 10);

    // 7/10 is exactly the pass mark and unlocks only the next section.
    let attempt = attempt_with_correct(&quiz, 7);
    let result = progress.submit_quiz(&mut player, 0, &attempt).await.unwrap();
    assert_eq!(result.correct, 7);
    assert_eq!(result.total, 10);
    assert!(result.passed);

    let views = player.section_views();
    assert!(views[0].quiz_passed);
    assert_eq!(views[0].quiz_score, Some(7));
    assert!(!views[1].locked);
    assert!(views[2].locked);

    // Re-marking the boundary video now advances into the unlocked section.
    let outcome = progress
        .mark_complete(&mut player, &VideoId::new("v4"))
        .await
        .unwrap();
    assert_eq!(outcome.advanced_to, Some(VideoId::new("v5")));

    // A fresh load sees the persisted pass and keeps section 1 open.
    let reloaded = progress.load(&course_id).await.unwrap();
    assert!(!reloaded.is_section_locked(1));
    assert!(reloaded.is_section_locked(2));
}

#[tokio::test]
async fn failing_grade_keeps_next_section_locked() {
    let backend = InMemoryBackend::new();
    let course = build_course(12);
    let completed: Vec<VideoId> = course
        .videos()
        .iter()
        .take(5)
        .map(|video| video.id().clone())
        .collect();
    backend.insert_course(course);
    backend.seed_completion(&CourseId::new("course-1"), &completed);

    let services = services_over(&backend);
    let progress = services.course_progress();
    let mut player = progress.load(&CourseId::new("course-1")).await.unwrap();

    let quiz = progress.take_test(&mut player, 0).await.unwrap();
    let attempt = attempt_with_correct(&quiz, 6);
    let result = progress.submit_quiz(&mut player, 0, &attempt).await.unwrap();

    assert!(!result.passed);
    assert!(player.is_section_locked(1));
    assert!(player.quiz_for_section(0).unwrap().completed());

    // A later passing retry unlocks immediately, without a reload.
    let retry = attempt_with_correct(&quiz, 10);
    let result = progress.submit_quiz(&mut player, 0, &retry).await.unwrap();
    assert!(result.passed);
    assert!(!player.is_section_locked(1));
}

#[tokio::test]
async fn completion_sync_failure_is_fail_closed() {
    let backend = InMemoryBackend::new();
    backend.insert_course(build_course(12));
    let services = services_over(&backend);
    let progress = services.course_progress();
    let mut player = progress.load(&CourseId::new("course-1")).await.unwrap();

    backend.set_fail_mark_complete(true);
    let err = progress
        .mark_complete(&mut player, &VideoId::new("v0"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlayerError::Api(_)));

    // No optimistic update: the local cache still shows nothing complete.
    assert!(!player.completion().is_complete(&VideoId::new("v0")));
    assert_eq!(player.selected_video().unwrap().id().as_str(), "v0");

    // Re-watching after the outage clears succeeds.
    backend.set_fail_mark_complete(false);
    let outcome = progress
        .mark_complete(&mut player, &VideoId::new("v0"))
        .await
        .unwrap();
    assert!(player.completion().is_complete(&VideoId::new("v0")));
    assert_eq!(outcome.advanced_to, Some(VideoId::new("v1")));
}

#[tokio::test]
async fn unknown_video_is_rejected_without_a_call() {
    let backend = InMemoryBackend::new();
    backend.insert_course(build_course(3));
    let services = services_over(&backend);
    let progress = services.course_progress();
    let mut player = progress.load(&CourseId::new("course-1")).await.unwrap();

    backend.set_fail_mark_complete(true);
    let err = progress
        .mark_complete(&mut player, &VideoId::new("missing"))
        .await
        .unwrap_err();
    // Precondition failure, not the simulated outage.
    assert!(matches!(err, PlayerError::UnknownVideo { .. }));
}

struct UnavailableQuizzes;

#[async_trait]
impl QuizApi for UnavailableQuizzes {
    async fn list_quizzes(&self, _course_id: &CourseId) -> Result<Vec<Quiz>, ApiError> {
        Err(ApiError::Connection("quiz store down".into()))
    }

    async fn save_quiz(
        &self,
        _course_id: &CourseId,
        _section_index: usize,
        _questions: &[Question],
    ) -> Result<Quiz, ApiError> {
        Err(ApiError::Connection("quiz store down".into()))
    }

    async fn submit_result(
        &self,
        _quiz_id: &QuizId,
        _result: QuizResult,
    ) -> Result<Quiz, ApiError> {
        Err(ApiError::Connection("quiz store down".into()))
    }
}

#[tokio::test]
async fn load_tolerates_missing_quiz_list() {
    let backend = InMemoryBackend::new();
    backend.insert_course(build_course(12));

    let services = AppServices::with_backends(
        fixed_clock(),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(UnavailableQuizzes),
        Arc::new(backend.clone()),
        Arc::new(backend),
    );
    let progress = services.course_progress();

    let player = progress.load(&CourseId::new("course-1")).await.unwrap();
    assert!(player.quiz_for_section(0).is_none());
    assert!(player.is_section_locked(1));
}
