//! Derived progress views.
//!
//! Section state (locked, videos-complete, quiz-passed) is never stored; it
//! is recomputed here from the completion map, the quiz cache, and the pass
//! history whenever any of them change. Keeping the derivation in one pure
//! function keeps the scattered-boolean failure mode out of the controller.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::model::{
    CompletionMap, Course, Quiz, is_section_locked, section_count, section_video_range,
};

/// Minimum course completion (percent of videos watched) for a certificate.
pub const CERTIFICATE_THRESHOLD_PERCENT: f64 = 70.0;

/// Everything a course surface needs to render one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub index: usize,
    pub title: String,
    /// Index range into the course's flat video list.
    pub videos: Range<usize>,
    pub locked: bool,
    pub all_videos_completed: bool,
    pub quiz_passed: bool,
    pub quiz_score: Option<u32>,
    pub quiz_total: Option<u32>,
}

/// Compute the view-model for every section of a course.
///
/// Pure function of its inputs; callers re-run it after each completion or
/// quiz event instead of patching cached flags.
#[must_use]
pub fn derive_section_views(
    course: &Course,
    completion: &CompletionMap,
    quizzes: &HashMap<usize, Quiz>,
    passed_sections: &BTreeSet<usize>,
) -> Vec<SectionView> {
    let video_count = course.video_count();
    (0..section_count(video_count))
        .map(|index| {
            let videos = section_video_range(index, video_count);
            let quiz = quizzes.get(&index);
            SectionView {
                index,
                title: format!("Section {}", index + 1),
                videos: videos.clone(),
                locked: is_section_locked(index, passed_sections),
                all_videos_completed: completion.all_complete(&course.videos()[videos]),
                quiz_passed: passed_sections.contains(&index),
                quiz_score: quiz.and_then(Quiz::score),
                quiz_total: quiz.and_then(Quiz::total),
            }
        })
        .collect()
}

/// Share of the course's videos that are complete, in percent.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completion_percent(course: &Course, completion: &CompletionMap) -> f64 {
    let total = course.video_count();
    if total == 0 {
        return 0.0;
    }
    let completed = course
        .videos()
        .iter()
        .filter(|video| completion.is_complete(video.id()))
        .count();
    completed as f64 / total as f64 * 100.0
}

/// True once enough of the course is complete to issue a certificate.
#[must_use]
pub fn certificate_eligible(percent: f64) -> bool {
    percent >= CERTIFICATE_THRESHOLD_PERCENT
}
