mod progress;
mod service;
mod setup;
mod state;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::QuizService;
pub use setup::SetupForm;
pub use state::{REQUEUE_DISTANCE, SessionAction, SessionPhase, SessionState};
pub use view::{QuestionView, ResultsView};
