use quiz_core::model::{IndexRange, Question};
use std::sync::Arc;

use crate::repository::QuestionRepository;

/// Filter for browsing the bank outside a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankFilter {
    /// Inclusive index range, applied before the text search.
    pub range: Option<IndexRange>,
    /// Case-insensitive substring matched against the prompt and every option.
    pub search: String,
}

impl BankFilter {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            range: None,
            search: term.into(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: IndexRange) -> Self {
        self.range = Some(range);
        self
    }

    fn matches(&self, question: &Question, needle: &str) -> bool {
        if self.range.is_some_and(|r| !r.contains(question.index())) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        question.prompt().to_lowercase().contains(needle)
            || question
                .options()
                .iter()
                .any(|o| o.to_lowercase().contains(needle))
    }
}

/// Questions matching `filter`, in bank order.
#[must_use]
pub fn browse(repo: &dyn QuestionRepository, filter: &BankFilter) -> Vec<Arc<Question>> {
    let needle = filter.search.to_lowercase();
    repo.questions()
        .iter()
        .filter(|q| filter.matches(q, &needle))
        .cloned()
        .collect()
}
