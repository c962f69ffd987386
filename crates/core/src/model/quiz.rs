use std::collections::HashMap;

use thiserror::Error;

use crate::model::ids::QuizId;

//
// ─── CONSTANTS ─────────────────────────────────────────────────────────────────
//

/// Every quiz is normalized to exactly this many questions.
pub const QUESTIONS_PER_QUIZ: usize = 10;

/// Every question is normalized to exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Minimum share of correct answers required to pass, in percent.
pub const PASS_PERCENT: u32 = 70;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("question must have exactly {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    #[error("correct answer index {index} is out of range")]
    CorrectAnswerOutOfRange { index: usize },

    #[error("quiz must contain at least one question")]
    NoQuestions,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question: four options, one correct index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuestion` for blank text,
    /// `QuizError::WrongOptionCount` unless exactly four options are given,
    /// and `QuizError::CorrectAnswerOutOfRange` unless the index is 0..=3.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuizError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizError::WrongOptionCount {
                expected: OPTIONS_PER_QUESTION,
                got: options.len(),
            });
        }
        if correct_answer >= OPTIONS_PER_QUESTION {
            return Err(QuizError::CorrectAnswerOutOfRange {
                index: correct_answer,
            });
        }
        Ok(Self {
            text,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }
}

//
// ─── ATTEMPT & RESULT ──────────────────────────────────────────────────────────
//

/// A learner's in-progress answers, keyed by question index.
///
/// Ephemeral and client-only: nothing is persisted until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAttempt {
    answers: HashMap<usize, usize>,
}

impl QuizAttempt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an option for a question; re-selecting overwrites.
    pub fn select(&mut self, question_index: usize, option_index: usize) {
        self.answers.insert(question_index, option_index);
    }

    #[must_use]
    pub fn answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

/// Outcome of grading one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: u32,
    pub total: u32,
    pub passed: bool,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A section's quiz together with its recorded outcome.
///
/// There is at most one quiz per (course, section) pair. Outcome fields are
/// updated in place when an attempt is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    section_index: usize,
    questions: Vec<Question>,
    completed: bool,
    passed: bool,
    score: Option<u32>,
    total: Option<u32>,
}

impl Quiz {
    /// Create a fresh, unattempted quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list.
    pub fn new(
        id: QuizId,
        section_index: usize,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            id,
            section_index,
            questions,
            completed: false,
            passed: false,
            score: None,
            total: None,
        })
    }

    /// Rehydrate a quiz from a persisted record, outcome included.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list.
    pub fn from_persisted(
        id: QuizId,
        section_index: usize,
        questions: Vec<Question>,
        completed: bool,
        passed: bool,
        score: Option<u32>,
        total: Option<u32>,
    ) -> Result<Self, QuizError> {
        let mut quiz = Self::new(id, section_index, questions)?;
        quiz.completed = completed;
        quiz.passed = passed;
        quiz.score = score;
        quiz.total = total;
        Ok(quiz)
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn section_index(&self) -> usize {
        self.section_index
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// True once this quiz has a passing attempt on record.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.completed && self.passed
    }

    /// Grade an attempt against this quiz.
    ///
    /// Unanswered questions count as incorrect. The pass mark is
    /// [`PASS_PERCENT`] of the total; integer math keeps the boundary exact
    /// (69/100 fails, 70/100 passes).
    #[must_use]
    pub fn grade(&self, attempt: &QuizAttempt) -> QuizResult {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| attempt.answer(*index) == Some(question.correct_answer()))
            .count();
        let correct = u32::try_from(correct).unwrap_or(u32::MAX);
        let passed = u64::from(correct) * 100 >= u64::from(total) * u64::from(PASS_PERCENT);
        QuizResult {
            correct,
            total,
            passed,
        }
    }

    /// Record a graded, persisted outcome in place.
    pub fn record_outcome(&mut self, result: QuizResult) {
        self.completed = true;
        self.passed = result.passed;
        self.score = Some(result.correct);
        self.total = Some(result.total);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
