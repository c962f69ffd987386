//! Section quiz generation: prompt building, defensive parsing of the
//! generator's free text, and normalization to the fixed quiz shape.
//!
//! The text-generation collaborator gives no schema guarantee, so the parser
//! accepts anything and the normalizer backfills whatever is missing. The
//! result is always exactly [`QUESTIONS_PER_QUIZ`] questions with
//! [`OPTIONS_PER_QUESTION`] options each.

use course_core::model::{LessonVideo, OPTIONS_PER_QUESTION, QUESTIONS_PER_QUIZ, Question};

/// Prompt asking the generator for a section quiz over the given videos.
///
/// Only titles are supplied; descriptions and timestamps tend to pull the
/// generator toward trivia about the videos themselves.
#[must_use]
pub fn section_prompt(videos: &[LessonVideo]) -> String {
    let mut prompt = String::from(
        "Create 10 multiple-choice questions based on the following lesson video titles. \
         Write your own questions that test understanding of the key concepts these titles \
         suggest; do not ask about the videos themselves.\n\nTitles:\n",
    );
    for video in videos {
        prompt.push_str("- ");
        prompt.push_str(video.title());
        prompt.push('\n');
    }
    prompt.push_str(
        "\nFormat each question with exactly 4 options (A, B, C, D) and state the correct \
         answer at the end, like this:\n\n\
         1. [Question text]\n\
         A) [Option A]\n\
         B) [Option B]\n\
         C) [Option C]\n\
         D) [Option D]\n\
         Correct answer: [A/B/C/D]\n",
    );
    prompt
}

/// Parse the generator's free text into structured questions.
///
/// Splits on top-level `N.` markers; within a block, the question text is
/// everything before the first `A)`-style option marker, each option runs
/// until the next marker or the correct-answer line, and the correct answer
/// is read from a trailing `Correct answer: X` (defaulting to the first
/// option). Blocks without any option marker are dropped. At most
/// [`QUESTIONS_PER_QUIZ`] questions are collected.
#[must_use]
pub fn parse_quiz_text(content: &str) -> Vec<Question> {
    let mut questions = Vec::new();

    for block in split_numbered_blocks(content) {
        if let Some(question) = parse_block(&block) {
            questions.push(question);
            if questions.len() >= QUESTIONS_PER_QUIZ {
                break;
            }
        }
    }

    questions
}

/// Pad a parsed list up to exactly [`QUESTIONS_PER_QUIZ`] questions.
///
/// An empty parse result yields a fully synthetic quiz.
#[must_use]
pub fn normalize_questions(mut questions: Vec<Question>) -> Vec<Question> {
    questions.truncate(QUESTIONS_PER_QUIZ);
    while questions.len() < QUESTIONS_PER_QUIZ {
        questions.push(synthetic_question(questions.len() + 1));
    }
    questions
}

/// The synthetic placeholder set used when generation or parsing fails.
#[must_use]
pub fn fallback_questions(count: usize) -> Vec<Question> {
    (1..=count).map(synthetic_question).collect()
}

fn synthetic_question(number: usize) -> Question {
    Question::new(
        format!("Question {number} about this section's content"),
        vec![
            "First option".into(),
            "Second option".into(),
            "Third option".into(),
            "Fourth option".into(),
        ],
        0,
    )
    .expect("synthetic question shape is valid")
}

//
// ─── PARSER INTERNALS ──────────────────────────────────────────────────────────
//

/// Group lines into blocks, each starting at a top-level `N.` marker.
/// Text before the first marker (preambles, "Here are your questions:") is
/// discarded.
fn split_numbered_blocks(content: &str) -> Vec<Vec<String>> {
    let mut blocks: Vec<Vec<String>> = Vec::new();

    for line in content.lines() {
        if let Some(rest) = strip_number_marker(line) {
            blocks.push(vec![rest.to_owned()]);
        } else if let Some(block) = blocks.last_mut() {
            block.push(line.trim().to_owned());
        }
    }

    blocks
}

/// Strip a leading `N.` marker, returning the remainder of the line.
fn strip_number_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = trimmed[digits..].strip_prefix('.')?;
    Some(rest.trim_start())
}

/// Leading `A)`/`B)`/`C)`/`D)` marker, as (option index, remainder).
fn strip_option_marker(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let letter = chars.next()?;
    if !('A'..='D').contains(&letter) {
        return None;
    }
    let rest = chars.as_str().strip_prefix(')')?;
    Some((letter as usize - 'A' as usize, rest.trim_start()))
}

/// Correct-answer letter from a `Correct answer: X` line, case-insensitive.
fn parse_correct_marker(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let lower = trimmed.to_ascii_lowercase();
    let rest = lower.strip_prefix("correct answer:")?;
    let offset = trimmed.len() - rest.len();
    trimmed[offset..]
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|letter| letter.to_ascii_uppercase())
        .filter(|letter| ('A'..='D').contains(letter))
        .map(|letter| letter as usize - 'A' as usize)
}

fn parse_block(lines: &[String]) -> Option<Question> {
    let mut question_text = String::new();
    let mut options: Vec<String> = Vec::new();
    let mut correct = 0usize;

    for line in lines {
        if let Some(index) = parse_correct_marker(line) {
            correct = index;
        } else if let Some((_, rest)) = strip_option_marker(line) {
            options.push(rest.trim().to_owned());
        } else if let Some(last) = options.last_mut() {
            // Continuation of a multi-line option.
            if !line.is_empty() {
                if !last.is_empty() {
                    last.push(' ');
                }
                last.push_str(line);
            }
        } else {
            if !question_text.is_empty() {
                question_text.push(' ');
            }
            question_text.push_str(line);
        }
    }

    let question_text = question_text.trim().to_owned();
    if question_text.is_empty() || options.is_empty() {
        return None;
    }

    while options.len() < OPTIONS_PER_QUESTION {
        options.push(format!("Option {}", options.len() + 1));
    }
    options.truncate(OPTIONS_PER_QUESTION);

    if correct >= OPTIONS_PER_QUESTION {
        correct = 0;
    }

    Question::new(question_text, options, correct).ok()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::VideoId;

    const WELL_FORMED: &str = "\
Here are your questions:

1. What is ownership in Rust?
A) A memory management model
B) A design pattern
C) A linter rule
D) A build flag
Correct answer: A

2. Which keyword borrows a value?
A) move
B) ref
C) borrow
D) take
Correct answer: B
";

    #[test]
    fn parses_well_formed_questions() {
        let questions = parse_quiz_text(WELL_FORMED);
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].text(), "What is ownership in Rust?");
        assert_eq!(questions[0].options()[0], "A memory management model");
        assert_eq!(questions[0].correct_answer(), 0);

        assert_eq!(questions[1].text(), "Which keyword borrows a value?");
        assert_eq!(questions[1].correct_answer(), 1);
    }

    #[test]
    fn missing_correct_marker_defaults_to_first_option() {
        let text = "\
1. Pick one.
A) one
B) two
C) three
D) four
";
        let questions = parse_quiz_text(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer(), 0);
    }

    #[test]
    fn correct_marker_is_case_insensitive() {
        let text = "\
1. Pick one.
A) one
B) two
C) three
D) four
correct answer: d
";
        let questions = parse_quiz_text(text);
        assert_eq!(questions[0].correct_answer(), 3);
    }

    #[test]
    fn short_option_lists_are_padded() {
        let text = "\
1. Pick one.
A) only
B) two here
Correct answer: B
";
        let questions = parse_quiz_text(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options().len(), 4);
        assert_eq!(questions[0].options()[2], "Option 3");
        assert_eq!(questions[0].correct_answer(), 1);
    }

    #[test]
    fn multiline_questions_and_options_are_joined() {
        let text = "\
1. A question that spans
two lines?
A) an option that also
spans lines
B) short
C) c
D) d
Correct answer: C
";
        let questions = parse_quiz_text(text);
        assert_eq!(questions[0].text(), "A question that spans two lines?");
        assert_eq!(questions[0].options()[0], "an option that also spans lines");
        assert_eq!(questions[0].correct_answer(), 2);
    }

    #[test]
    fn blocks_without_options_are_dropped() {
        let text = "\
1. Just some prose with no options at all.
2. Pick one.
A) a
B) b
C) c
D) d
Correct answer: A
";
        let questions = parse_quiz_text(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text(), "Pick one.");
    }

    #[test]
    fn unparseable_text_yields_nothing() {
        assert!(parse_quiz_text("complete nonsense, no structure").is_empty());
        assert!(parse_quiz_text("").is_empty());
    }

    #[test]
    fn parser_stops_at_ten_questions() {
        let mut text = String::new();
        for number in 1..=14 {
            text.push_str(&format!(
                "{number}. Question number {number}?\nA) a\nB) b\nC) c\nD) d\nCorrect answer: B\n"
            ));
        }
        let questions = parse_quiz_text(&text);
        assert_eq!(questions.len(), QUESTIONS_PER_QUIZ);
    }

    #[test]
    fn normalization_pads_to_ten() {
        let three = parse_quiz_text(
            "\
1. One?
A) a
B) b
C) c
D) d
Correct answer: A
2. Two?
A) a
B) b
C) c
D) d
Correct answer: B
3. Three?
A) a
B) b
C) c
D) d
Correct answer: C
",
        );
        assert_eq!(three.len(), 3);

        let normalized = normalize_questions(three);
        assert_eq!(normalized.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(normalized[0].text(), "One?");
        assert_eq!(
            normalized[3].text(),
            "Question 4 about this section's content"
        );
        for question in &normalized {
            assert_eq!(question.options().len(), OPTIONS_PER_QUESTION);
            assert!(question.correct_answer() < OPTIONS_PER_QUESTION);
        }
    }

    #[test]
    fn empty_parse_normalizes_to_fully_synthetic() {
        let normalized = normalize_questions(Vec::new());
        assert_eq!(normalized.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(
            normalized[0].text(),
            "Question 1 about this section's content"
        );
        assert_eq!(normalized[0].correct_answer(), 0);
    }

    #[test]
    fn fallback_set_has_requested_size() {
        let questions = fallback_questions(QUESTIONS_PER_QUIZ);
        assert_eq!(questions.len(), QUESTIONS_PER_QUIZ);
        for question in &questions {
            assert_eq!(question.options().len(), OPTIONS_PER_QUESTION);
        }
    }

    #[test]
    fn prompt_lists_every_title() {
        let videos: Vec<LessonVideo> = (0..3)
            .map(|index| {
                LessonVideo::new(
                    VideoId::new(format!("v{index}")),
                    format!("Lesson {index}"),
                    "",
                )
                .unwrap()
            })
            .collect();
        let prompt = section_prompt(&videos);
        for video in &videos {
            assert!(prompt.contains(video.title()));
        }
        assert!(prompt.contains("Correct answer:"));
    }
}
