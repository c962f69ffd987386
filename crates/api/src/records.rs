//! Wire-shaped records and their validation into strict domain types.
//!
//! Backend quiz payloads are loosely typed (question shape varies by source:
//! generated, fallback, or older saves). The record types mirror that shape
//! and all normalization happens once, here, at ingestion; everything past
//! this boundary works with the validated `course_core` types.

use serde::{Deserialize, Serialize};

use course_core::model::{OPTIONS_PER_QUESTION, Question, Quiz, QuizError, QuizId};

use crate::contracts::ApiError;

/// One question as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, rename = "correctAnswer")]
    pub correct_answer: usize,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_answer(),
        }
    }

    /// Normalize into a strict domain question.
    ///
    /// Options are padded with placeholders up to four and truncated beyond;
    /// an out-of-range correct index falls back to the first option. Returns
    /// `None` for a blank question text, which is unrecoverable.
    fn into_question(self) -> Option<Result<Question, QuizError>> {
        if self.question.trim().is_empty() {
            return None;
        }

        let mut options = self.options;
        while options.len() < OPTIONS_PER_QUESTION {
            options.push(format!("Option {}", options.len() + 1));
        }
        options.truncate(OPTIONS_PER_QUESTION);

        let correct = if self.correct_answer < OPTIONS_PER_QUESTION {
            self.correct_answer
        } else {
            0
        };

        Some(Question::new(self.question, options, correct))
    }
}

/// One quiz as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, rename = "sectionIndex")]
    pub section_index: Option<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default, rename = "totalQuestions")]
    pub total: Option<u32>,
}

impl QuizRecord {
    /// Validate and normalize into a domain quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Malformed` when the record is unrecoverable:
    /// missing id, negative section index, or no usable questions.
    pub fn into_quiz(self) -> Result<Quiz, ApiError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::Malformed("quiz record has no id".into()))?;

        let section_index = match self.section_index {
            Some(index) if index >= 0 => usize::try_from(index)
                .map_err(|_| ApiError::Malformed(format!("section index {index} out of range")))?,
            Some(index) => {
                return Err(ApiError::Malformed(format!(
                    "negative section index {index}"
                )));
            }
            None => return Err(ApiError::Malformed("quiz record has no section index".into())),
        };

        let raw_count = self.questions.len();
        let questions = self
            .questions
            .into_iter()
            .filter_map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ApiError::Malformed(err.to_string()))?;

        if questions.len() < raw_count {
            tracing::warn!(
                quiz_id = %id,
                dropped = raw_count - questions.len(),
                "dropped blank questions from quiz record"
            );
        }

        Quiz::from_persisted(
            QuizId::new(id),
            section_index,
            questions,
            self.completed,
            self.passed,
            self.score,
            self.total,
        )
        .map_err(|err| ApiError::Malformed(err.to_string()))
    }
}
