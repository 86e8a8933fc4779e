use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionIndex;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question index must be >= 1")]
    ZeroIndex,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option cannot be empty")]
    EmptyOption,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("answer {0:?} is not one of the options")]
    AnswerNotAnOption(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question from the bank.
///
/// Immutable once built: the canonical option order is kept as loaded and
/// presentation order is derived separately via [`Question::display_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    index: QuestionIndex,
    prompt: String,
    options: Vec<String>,
    correct_option: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the index is zero, the prompt is blank, there are
    /// fewer than two options, an option is blank or repeated, or the answer is not
    /// one of the options.
    pub fn new(
        index: QuestionIndex,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_option = correct_option.into();

        if index.value() == 0 {
            return Err(QuestionError::ZeroIndex);
        }
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(correct_option.as_str()) {
            return Err(QuestionError::AnswerNotAnOption(correct_option));
        }

        Ok(Self {
            index,
            prompt,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in canonical (load) order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }

    /// Options in presentation order.
    ///
    /// The order is a Fisher-Yates shuffle driven by a generator seeded from the
    /// question index, so a given question always renders the same way while
    /// neighbouring questions get different layouts.
    #[must_use]
    pub fn display_options(&self) -> Vec<&str> {
        let mut order: Vec<&str> = self.options.iter().map(String::as_str).collect();
        let mut rng = StdRng::seed_from_u64(u64::from(self.index));
        order.shuffle(&mut rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn build(index: u32) -> Question {
        Question::new(
            QuestionIndex::new(index),
            format!("Q{index}"),
            options(&["alpha", "beta", "gamma", "delta", "epsilon"]),
            "gamma",
        )
        .unwrap()
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new(QuestionIndex::new(1), "Q", options(&["a", "b"]), "c").unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotAnOption("c".into()));
    }

    #[test]
    fn rejects_duplicate_options() {
        let err =
            Question::new(QuestionIndex::new(1), "Q", options(&["a", "b", "a"]), "a").unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("a".into()));
    }

    #[test]
    fn rejects_zero_index_and_blank_prompt() {
        assert_eq!(
            Question::new(QuestionIndex::new(0), "Q", options(&["a", "b"]), "a").unwrap_err(),
            QuestionError::ZeroIndex
        );
        assert_eq!(
            Question::new(QuestionIndex::new(1), "  ", options(&["a", "b"]), "a").unwrap_err(),
            QuestionError::EmptyPrompt
        );
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new(QuestionIndex::new(1), "Q", options(&["a"]), "a").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { count: 1 });
    }

    #[test]
    fn display_order_is_stable_and_leaves_canonical_order() {
        let question = build(7);
        let first = question.display_options();
        let second = question.display_options();
        assert_eq!(first, second);
        assert_eq!(
            question.options(),
            options(&["alpha", "beta", "gamma", "delta", "epsilon"]).as_slice()
        );

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["alpha", "beta", "delta", "epsilon", "gamma"]);
    }

    #[test]
    fn display_order_varies_across_questions() {
        let orders: HashSet<Vec<String>> = (1..=12)
            .map(|i| {
                build(i)
                    .display_options()
                    .into_iter()
                    .map(str::to_owned)
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }
}
