#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{QuizError, SessionError};
pub use sessions::{
    QuestionView, QuizService, REQUEUE_DISTANCE, ResultsView, SessionAction, SessionPhase,
    SessionProgress, SessionState, SetupForm,
};
