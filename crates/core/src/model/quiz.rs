use thiserror::Error;

use crate::model::progress::Percent;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz must contain at least one question")]
    EmptyQuiz,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least two options")]
    TooFewOptions,

    #[error("correct answer must be one of the options")]
    UnknownAnswer,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
}

impl QuizQuestion {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the prompt is blank, fewer than two options
    /// are offered, or the correct answer is not among the options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuizError::TooFewOptions);
        }
        let correct_answer = correct_answer.into();
        if !options.contains(&correct_answer) {
            return Err(QuizError::UnknownAnswer);
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }

    // Accessors
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// The ordered question list for one lesson's quiz.
///
/// Quiz content is supplied externally; the core only needs to turn a set
/// of answers into a percentage score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Creates a quiz from an ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuiz` if no questions are provided.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Scores a run of answers against the questions, position by
    /// position. Missing answers count as wrong; extra answers are
    /// ignored.
    #[must_use]
    pub fn grade(&self, answers: &[&str]) -> Percent {
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| question.correct_answer() == **answer)
            .count();

        // `new` guarantees a non-empty question list
        Percent::from_ratio(correct, self.questions.len()).unwrap_or(Percent::ZERO)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, correct: &str) -> QuizQuestion {
        QuizQuestion::new(
            prompt,
            vec!["Sugeng enjing".into(), correct.into(), "Matur nuwun".into()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn question_rejects_blank_prompt() {
        let err = QuizQuestion::new("  ", vec!["a".into(), "b".into()], "a").unwrap_err();
        assert_eq!(err, QuizError::EmptyPrompt);
    }

    #[test]
    fn question_rejects_single_option() {
        let err = QuizQuestion::new("Q", vec!["a".into()], "a").unwrap_err();
        assert_eq!(err, QuizError::TooFewOptions);
    }

    #[test]
    fn question_rejects_answer_outside_options() {
        let err = QuizQuestion::new("Q", vec!["a".into(), "b".into()], "c").unwrap_err();
        assert_eq!(err, QuizError::UnknownAnswer);
    }

    #[test]
    fn quiz_rejects_empty_question_list() {
        assert_eq!(Quiz::new(vec![]).unwrap_err(), QuizError::EmptyQuiz);
    }

    #[test]
    fn grade_counts_exact_matches() {
        let quiz = Quiz::new(vec![
            question("How do you say 'Hello'?", "Sugeng rawuh"),
            question("How do you say 'Thank you'?", "Matur nuwun"),
            question("How do you say 'Goodbye'?", "Sugeng tindak"),
        ])
        .unwrap();

        let score = quiz.grade(&["Sugeng rawuh", "Matur nuwun", "Sugeng enjing"]);
        assert_eq!(score.value(), 67);

        let perfect = quiz.grade(&["Sugeng rawuh", "Matur nuwun", "Sugeng tindak"]);
        assert_eq!(perfect, Percent::FULL);
    }

    #[test]
    fn grade_treats_missing_answers_as_wrong() {
        let quiz = Quiz::new(vec![
            question("Q1", "Sugeng rawuh"),
            question("Q2", "Matur nuwun"),
        ])
        .unwrap();

        let score = quiz.grade(&["Sugeng rawuh"]);
        assert_eq!(score.value(), 50);

        let none = quiz.grade(&[]);
        assert_eq!(none, Percent::ZERO);
    }
}
