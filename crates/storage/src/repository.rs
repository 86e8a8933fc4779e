use quiz_core::model::{Question, QuestionError, QuestionIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while loading or reading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question {0} not found")]
    NotFound(QuestionIndex),

    #[error("failed to read question bank {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("duplicate question index {0}")]
    DuplicateIndex(QuestionIndex),

    #[error("invalid question {index}: {source}")]
    InvalidQuestion {
        index: u32,
        #[source]
        source: QuestionError,
    },
}

/// Persisted shape of a question.
///
/// Field names follow the bank file format (`question`, `answer`) and are mapped
/// onto the validated domain `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub index: u32,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            index: question.index().value(),
            question: question.prompt().to_owned(),
            options: question.options().to_vec(),
            answer: question.correct_option().to_owned(),
        }
    }

    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` if validation fails.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let index = self.index;
        Question::new(
            QuestionIndex::new(index),
            self.question,
            self.options,
            self.answer,
        )
        .map_err(|source| StorageError::InvalidQuestion { index, source })
    }
}

/// Read-only access to the question bank.
///
/// The bank is loaded once and never mutated, so implementations hand out shared
/// `Arc<Question>` values in ascending index order.
pub trait QuestionRepository: Send + Sync {
    /// All questions, ordered by index.
    fn questions(&self) -> &[Arc<Question>];

    /// Fetch a question by index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no question has that index.
    fn get(&self, index: QuestionIndex) -> Result<Arc<Question>, StorageError> {
        self.questions()
            .iter()
            .find(|q| q.index() == index)
            .cloned()
            .ok_or(StorageError::NotFound(index))
    }

    fn len(&self) -> usize {
        self.questions().len()
    }

    fn is_empty(&self) -> bool {
        self.questions().is_empty()
    }
}

/// Question bank held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    questions: Vec<Arc<Question>>,
}

impl InMemoryRepository {
    /// Build a bank from validated questions, sorted by index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateIndex` if two questions share an index.
    pub fn new(questions: impl IntoIterator<Item = Question>) -> Result<Self, StorageError> {
        let mut questions: Vec<Arc<Question>> = questions.into_iter().map(Arc::new).collect();
        questions.sort_by_key(|q| q.index());

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.index()) {
                return Err(StorageError::DuplicateIndex(question.index()));
            }
        }

        Ok(Self { questions })
    }

    /// Build a bank from raw records, validating each one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` or `StorageError::DuplicateIndex`.
    pub fn from_records(
        records: impl IntoIterator<Item = QuestionRecord>,
    ) -> Result<Self, StorageError> {
        let questions = records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }
}

impl QuestionRepository for InMemoryRepository {
    fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }
}
