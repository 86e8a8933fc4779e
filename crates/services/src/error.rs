//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SelectionError;
use storage::StorageError;

use crate::sessions::{SessionAction, SessionPhase};

/// Errors emitted by session transitions.
///
/// A rejected transition leaves the caller's state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition {
        action: SessionAction,
        phase: SessionPhase,
    },
    #[error("{0:?} is not an option of the current question")]
    UnknownOption(String),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
