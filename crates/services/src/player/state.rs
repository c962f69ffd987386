use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

use course_core::model::{
    CompletionMap, Course, LessonVideo, Quiz, VideoId, is_section_locked, section_count,
    section_of_video, section_video_range,
};
use course_core::playback::{PlaybackProgress, PlaybackTracker};
use course_core::progress::{SectionView, derive_section_views};

use crate::error::PlayerError;

//
// ─── COURSE PLAYER ─────────────────────────────────────────────────────────────
//

/// In-memory state for one loaded course: the playlist, the learner's
/// completion cache, the per-section quiz cache, and the pass history.
///
/// All mutations happen through `&mut self` in response to discrete events
/// (video completed, quiz submitted), mirroring the single-threaded event
/// loop the player runs under. Derived section state is recomputed on demand,
/// never cached.
pub struct CoursePlayer {
    course: Course,
    completion: CompletionMap,
    quizzes: HashMap<usize, Quiz>,
    passed_sections: BTreeSet<usize>,
    selected: Option<usize>,
    playback: PlaybackTracker,
    position_secs: f64,
    generating: bool,
    loaded_at: DateTime<Utc>,
}

impl CoursePlayer {
    /// Build player state from freshly fetched course data.
    ///
    /// The pass history is derived from quizzes with a recorded passing
    /// attempt, and the initially selected video is the first video of the
    /// first unlocked section (first video overall when nothing is open).
    ///
    /// `loaded_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(
        course: Course,
        completion: CompletionMap,
        quizzes: Vec<Quiz>,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        let mut by_section: HashMap<usize, Quiz> = HashMap::with_capacity(quizzes.len());
        let mut passed_sections = BTreeSet::new();
        for quiz in quizzes {
            if quiz.is_passed() {
                passed_sections.insert(quiz.section_index());
            }
            // First quiz wins on duplicate sections, matching how the
            // backend list is consumed elsewhere.
            by_section.entry(quiz.section_index()).or_insert(quiz);
        }

        let mut player = Self {
            course,
            completion,
            quizzes: by_section,
            passed_sections,
            selected: None,
            playback: PlaybackTracker::new(),
            position_secs: 0.0,
            generating: false,
            loaded_at,
        };
        player.select_initial_video();
        player
    }

    fn select_initial_video(&mut self) {
        let video_count = self.course.video_count();
        if video_count == 0 {
            return;
        }

        let first_open = (0..section_count(video_count))
            .find(|index| !is_section_locked(*index, &self.passed_sections))
            .map(|index| section_video_range(index, video_count).start);

        self.set_selected(first_open.unwrap_or(0));
    }

    fn set_selected(&mut self, index: usize) {
        self.selected = Some(index);
        self.position_secs = 0.0;
        if let Some(video) = self.course.video_at(index) {
            self.playback.reset(video.id().clone());
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionMap {
        &self.completion
    }

    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_video(&self) -> Option<&LessonVideo> {
        self.selected.and_then(|index| self.course.video_at(index))
    }

    /// Sections the learner has passed so far. Grow-only within a session.
    #[must_use]
    pub fn passed_sections(&self) -> &BTreeSet<usize> {
        &self.passed_sections
    }

    /// True while a quiz generation request is in flight.
    ///
    /// Advisory only: surfaces use it to disable their "take test" control,
    /// nothing here rejects overlapping requests.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub(crate) fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }

    /// Recompute the per-section view-models from current state.
    #[must_use]
    pub fn section_views(&self) -> Vec<SectionView> {
        derive_section_views(
            &self.course,
            &self.completion,
            &self.quizzes,
            &self.passed_sections,
        )
    }

    #[must_use]
    pub fn is_section_locked(&self, section_index: usize) -> bool {
        is_section_locked(section_index, &self.passed_sections)
    }

    /// True when every video of the section is complete.
    #[must_use]
    pub fn section_complete(&self, section_index: usize) -> bool {
        let range = section_video_range(section_index, self.course.video_count());
        if range.is_empty() {
            return false;
        }
        self.completion.all_complete(&self.course.videos()[range])
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        section_count(self.course.video_count())
    }

    #[must_use]
    pub fn quiz_for_section(&self, section_index: usize) -> Option<&Quiz> {
        self.quizzes.get(&section_index)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Select a video for playback, resetting the position to zero.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::UnknownVideo` for a video outside this course
    /// and `PlayerError::SectionLocked` when its section is still gated.
    pub fn select_video(&mut self, video_id: &VideoId) -> Result<(), PlayerError> {
        let index = self
            .course
            .index_of(video_id)
            .ok_or_else(|| PlayerError::UnknownVideo {
                id: video_id.clone(),
            })?;
        let section = section_of_video(index);
        if self.is_section_locked(section) {
            return Err(PlayerError::SectionLocked { index: section });
        }
        self.set_selected(index);
        Ok(())
    }

    /// Last reported playback position for the selected video, in seconds.
    /// Resets to zero on every selection change.
    #[must_use]
    pub fn playback_position(&self) -> f64 {
        self.position_secs
    }

    /// Feed a playback progress report for the selected video; returns the
    /// video's completion signal the first time it crosses the threshold.
    pub fn observe_playback(&mut self, progress: PlaybackProgress) -> Option<VideoId> {
        self.position_secs = progress.position_secs;
        self.playback.observe(progress)
    }

    /// Replace the completion cache with the server's authoritative map.
    pub fn apply_completion(&mut self, map: CompletionMap) {
        self.completion.replace(map);
    }

    /// Auto-advance after a completed video: select the next video in flat
    /// order unless the course ends or the next section is still locked.
    pub fn advance_after(&mut self, video_id: &VideoId) -> Option<VideoId> {
        let index = self.course.index_of(video_id)?;
        let next = index + 1;
        let video = self.course.video_at(next)?;
        if self.is_section_locked(section_of_video(next)) {
            return None;
        }
        let id = video.id().clone();
        self.set_selected(next);
        Some(id)
    }

    /// Cache a freshly persisted quiz for its section.
    pub fn record_quiz(&mut self, quiz: Quiz) {
        self.quizzes.insert(quiz.section_index(), quiz);
    }

    /// Apply a submitted quiz returned by the backend; a passing outcome
    /// adds the section to the pass history (there is no unpass).
    pub fn apply_submitted(&mut self, quiz: Quiz) {
        if quiz.is_passed() {
            self.passed_sections.insert(quiz.section_index());
        }
        self.quizzes.insert(quiz.section_index(), quiz);
    }
}

impl fmt::Debug for CoursePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoursePlayer")
            .field("course_id", self.course.id())
            .field("video_count", &self.course.video_count())
            .field("completed", &self.completion.completed_count())
            .field("quizzes", &self.quizzes.len())
            .field("passed_sections", &self.passed_sections)
            .field("selected", &self.selected)
            .field("generating", &self.generating)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{CourseId, Question, QuizId};
    use course_core::time::fixed_now;

    fn build_course(video_count: usize) -> Course {
        let videos = (0..video_count)
            .map(|index| {
                LessonVideo::new(VideoId::new(format!("v{index}")), format!("Video {index}"), "")
                    .unwrap()
            })
            .collect();
        Course::new(CourseId::new("c1"), "Course", "", videos).unwrap()
    }

    fn passed_quiz(section_index: usize) -> Quiz {
        let questions = (0..10)
            .map(|_| {
                Question::new("Q", vec!["a".into(), "b".into(), "c".into(), "d".into()], 0)
                    .unwrap()
            })
            .collect();
        Quiz::from_persisted(
            QuizId::new(format!("quiz-{section_index}")),
            section_index,
            questions,
            true,
            true,
            Some(8),
            Some(10),
        )
        .unwrap()
    }

    fn completion_of(course: &Course, completed: usize) -> CompletionMap {
        CompletionMap::from_entries(
            course
                .videos()
                .iter()
                .take(completed)
                .map(|video| (video.id().clone(), true))
                .collect(),
        )
    }

    #[test]
    fn initial_selection_is_first_unlocked_video() {
        let course = build_course(12);
        let player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());
        assert_eq!(player.selected_video().unwrap().id().as_str(), "v0");
    }

    #[test]
    fn initial_selection_skips_passed_sections() {
        let course = build_course(12);
        let player = CoursePlayer::new(
            course,
            CompletionMap::new(),
            vec![passed_quiz(0)],
            fixed_now(),
        );
        // Section 0 is passed but still unlocked, so it stays first.
        assert_eq!(player.selected_video().unwrap().id().as_str(), "v0");
        assert!(!player.is_section_locked(1));
    }

    #[test]
    fn select_video_rejects_locked_section() {
        let course = build_course(12);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());

        let err = player.select_video(&VideoId::new("v7")).unwrap_err();
        assert!(matches!(err, PlayerError::SectionLocked { index: 1 }));

        player.select_video(&VideoId::new("v3")).unwrap();
        assert_eq!(player.selected_index(), Some(3));
    }

    #[test]
    fn select_video_rejects_unknown_video() {
        let course = build_course(3);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());
        let err = player.select_video(&VideoId::new("missing")).unwrap_err();
        assert!(matches!(err, PlayerError::UnknownVideo { .. }));
    }

    #[test]
    fn advance_stops_at_lock_boundary() {
        let course = build_course(12);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());

        // Within section 0 the advance proceeds.
        assert_eq!(
            player.advance_after(&VideoId::new("v0")),
            Some(VideoId::new("v1"))
        );
        assert_eq!(player.selected_index(), Some(1));

        // v4 is the last video of section 0; section 1 is locked.
        assert_eq!(player.advance_after(&VideoId::new("v4")), None);
        assert_eq!(player.selected_index(), Some(1));
    }

    #[test]
    fn advance_crosses_boundary_once_unlocked() {
        let course = build_course(12);
        let mut player = CoursePlayer::new(
            course,
            CompletionMap::new(),
            vec![passed_quiz(0)],
            fixed_now(),
        );

        assert_eq!(
            player.advance_after(&VideoId::new("v4")),
            Some(VideoId::new("v5"))
        );
    }

    #[test]
    fn advance_stops_at_course_end() {
        let course = build_course(3);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());
        assert_eq!(player.advance_after(&VideoId::new("v2")), None);
    }

    #[test]
    fn section_complete_follows_completion_cache() {
        let course = build_course(12);
        let completion = completion_of(&course, 5);
        let mut player = CoursePlayer::new(course, completion, Vec::new(), fixed_now());

        assert!(player.section_complete(0));
        assert!(!player.section_complete(1));
        assert!(!player.section_complete(99));

        player.apply_completion(CompletionMap::new());
        assert!(!player.section_complete(0));
    }

    #[test]
    fn apply_submitted_pass_unlocks_next_section() {
        let course = build_course(12);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());
        assert!(player.is_section_locked(1));

        player.apply_submitted(passed_quiz(0));
        assert!(!player.is_section_locked(1));
        assert!(player.is_section_locked(2));
        assert!(player.passed_sections().contains(&0));
    }

    #[test]
    fn failed_submission_does_not_relock_or_pass() {
        let course = build_course(12);
        let mut player = CoursePlayer::new(
            course,
            CompletionMap::new(),
            vec![passed_quiz(0)],
            fixed_now(),
        );

        let questions = (0..10)
            .map(|_| {
                Question::new("Q", vec!["a".into(), "b".into(), "c".into(), "d".into()], 0)
                    .unwrap()
            })
            .collect();
        let failed = Quiz::from_persisted(
            QuizId::new("quiz-1"),
            1,
            questions,
            true,
            false,
            Some(2),
            Some(10),
        )
        .unwrap();
        player.apply_submitted(failed);

        // Section 0's earlier pass is untouched; section 2 stays locked.
        assert!(!player.is_section_locked(1));
        assert!(player.is_section_locked(2));
    }

    #[test]
    fn playback_completion_fires_once_for_selected_video() {
        let course = build_course(3);
        let mut player = CoursePlayer::new(course, CompletionMap::new(), Vec::new(), fixed_now());

        let progress = PlaybackProgress {
            position_secs: 96.0,
            duration_secs: 100.0,
            playing: true,
        };
        assert_eq!(player.observe_playback(progress), Some(VideoId::new("v0")));
        assert_eq!(player.observe_playback(progress), None);
        assert!((player.playback_position() - 96.0).abs() < f64::EPSILON);

        // Selecting another video resets the position and re-arms the latch.
        player.select_video(&VideoId::new("v1")).unwrap();
        assert_eq!(player.playback_position(), 0.0);
        assert_eq!(player.observe_playback(progress), Some(VideoId::new("v1")));
    }
}
