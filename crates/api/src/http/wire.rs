//! Request/response shapes for the platform's JSON endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use course_core::model::{CompletionMap, Course, CourseId, LessonVideo, VideoId};

use crate::contracts::{ApiError, CertificateDetails, CertificateRecord};
use crate::records::QuestionRecord;

#[derive(Debug, Deserialize)]
pub(crate) struct VideoDto {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub videos: Vec<VideoDto>,
}

impl PlaylistDto {
    pub(crate) fn into_course(self, id: CourseId) -> Result<Course, ApiError> {
        let videos = self
            .videos
            .into_iter()
            .map(|video| {
                LessonVideo::new(VideoId::new(video.video_id), video.title, video.description)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ApiError::Malformed(err.to_string()))?;

        Course::new(id, self.title, self.description, videos)
            .map_err(|err| ApiError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkCompleteRequest<'a> {
    #[serde(rename = "playlistId")]
    pub playlist_id: &'a str,
    #[serde(rename = "videoId")]
    pub video_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkCompleteResponse {
    #[serde(rename = "videoCompletionStatus", default)]
    pub video_completion_status: HashMap<String, bool>,
}

pub(crate) fn completion_map_from_wire(entries: HashMap<String, bool>) -> CompletionMap {
    CompletionMap::from_entries(
        entries
            .into_iter()
            .map(|(id, done)| (VideoId::new(id), done))
            .collect(),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveQuizRequest<'a> {
    #[serde(rename = "playlistId")]
    pub playlist_id: &'a str,
    #[serde(rename = "sectionIndex")]
    pub section_index: usize,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitQuizRequest<'a> {
    #[serde(rename = "testId")]
    pub test_id: &'a str,
    pub score: u32,
    #[serde(rename = "totalQuestions")]
    pub total_questions: u32,
    pub passed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityResponse {
    #[serde(rename = "userName", default)]
    pub user_name: String,
    #[serde(rename = "courseName", default)]
    pub course_name: String,
    #[serde(default)]
    pub eligible: bool,
    #[serde(default)]
    pub completion: f64,
}

impl From<EligibilityResponse> for CertificateDetails {
    fn from(value: EligibilityResponse) -> Self {
        Self {
            learner_name: value.user_name,
            course_name: value.course_name,
            eligible: value.eligible,
            completion_percent: value.completion,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveCertificateRequest<'a> {
    #[serde(rename = "playlistId")]
    pub playlist_id: &'a str,
    #[serde(rename = "certificateUrl")]
    pub certificate_url: &'a str,
    #[serde(rename = "userName")]
    pub user_name: &'a str,
    #[serde(rename = "courseName")]
    pub course_name: &'a str,
    #[serde(rename = "completionPercentage")]
    pub completion_percentage: f64,
    #[serde(rename = "issuedDate")]
    pub issued_date: DateTime<Utc>,
}

impl<'a> SaveCertificateRequest<'a> {
    pub(crate) fn from_record(record: &'a CertificateRecord) -> Self {
        Self {
            playlist_id: record.course_id.as_str(),
            certificate_url: &record.certificate_url,
            user_name: &record.learner_name,
            course_name: &record.course_name,
            completion_percentage: record.completion_percent,
            issued_date: record.issued_at,
        }
    }
}
