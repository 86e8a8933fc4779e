use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::model::ids::QuestionIndex;
use crate::model::question::Question;

/// Setup range shown before a bank size is known.
pub const DEFAULT_RANGE_END: u32 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("invalid range {start}..={end} for a bank of {size} questions")]
    InvalidRange { start: u32, end: u32, size: usize },

    #[error("requested {requested} questions but only {available} are available")]
    InsufficientPool { requested: usize, available: usize },
}

//
// ─── INDEX RANGE ───────────────────────────────────────────────────────────────
//

/// Inclusive, 1-based range over question indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: u32,
    pub end: u32,
}

impl IndexRange {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check the range against a bank of `size` questions.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InvalidRange` if `start < 1`, `start > end`, or
    /// `end` is past the end of the bank.
    pub fn validate(self, size: usize) -> Result<Self, SelectionError> {
        let end_in_bank = usize::try_from(self.end).is_ok_and(|end| end <= size);
        if self.start < 1 || self.start > self.end || !end_in_bank {
            return Err(SelectionError::InvalidRange {
                start: self.start,
                end: self.end,
                size,
            });
        }
        Ok(self)
    }

    #[must_use]
    pub fn contains(&self, index: QuestionIndex) -> bool {
        (self.start..=self.end).contains(&index.value())
    }

    /// Number of indices covered; zero for an inverted range.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        usize::try_from(self.end - self.start)
            .map_or(usize::MAX, |span| span.saturating_add(1))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//
// ─── SELECTION SPEC ────────────────────────────────────────────────────────────
//

/// How the question set for a quiz is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionSpec {
    /// Every question with `start <= index <= end`, in bank order.
    Range { start: u32, end: u32 },
    /// `count` questions sampled uniformly, optionally from a sub-range.
    Random {
        count: usize,
        pool: Option<IndexRange>,
    },
}

impl SelectionSpec {
    /// The setup defaults for a bank of `size` questions: the first five (or fewer).
    #[must_use]
    pub fn default_for(size: usize) -> Self {
        let end = u32::try_from(size).map_or(DEFAULT_RANGE_END, |s| s.min(DEFAULT_RANGE_END));
        Self::Range { start: 1, end }
    }
}

impl Default for SelectionSpec {
    fn default() -> Self {
        Self::Range {
            start: 1,
            end: DEFAULT_RANGE_END,
        }
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Ordered question set produced by the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    spec: SelectionSpec,
    questions: Vec<Arc<Question>>,
}

impl Selection {
    #[must_use]
    pub fn new(spec: SelectionSpec, questions: Vec<Arc<Question>>) -> Self {
        Self { spec, questions }
    }

    #[must_use]
    pub fn spec(&self) -> SelectionSpec {
        self.spec
    }

    #[must_use]
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    #[must_use]
    pub fn indices(&self) -> Vec<QuestionIndex> {
        self.questions.iter().map(|q| q.index()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn into_questions(self) -> Vec<Arc<Question>> {
        self.questions
    }
}
