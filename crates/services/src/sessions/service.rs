use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Question, QuestionIndex, Selection, SelectionSpec};
use quiz_core::selector;
use storage::{BankFilter, QuestionRepository, browse};

use super::setup::SetupForm;
use super::state::SessionState;
use super::view::{QuestionView, ResultsView};
use crate::Clock;
use crate::error::QuizError;

/// Host-facing entry point: owns the bank, the clock and the random source, and
/// applies transitions to session snapshots supplied by the caller.
pub struct QuizService {
    clock: Clock,
    bank: Arc<dyn QuestionRepository>,
    rng: StdRng,
}

impl QuizService {
    /// Create a service with an OS-seeded random source.
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            bank,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a fixed seed so random selections are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn bank(&self) -> &dyn QuestionRepository {
        self.bank.as_ref()
    }

    /// Setup defaults sized to the bank.
    #[must_use]
    pub fn setup_form(&self) -> SetupForm {
        SetupForm::new(self.bank.len())
    }

    /// Build a question set without starting a session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Selection` for invalid ranges or oversized samples.
    pub fn select(&mut self, spec: SelectionSpec) -> Result<Selection, QuizError> {
        Ok(selector::select(self.bank.questions(), spec, &mut self.rng)?)
    }

    /// Select questions for `spec` and start a session over them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Selection` or `QuizError::Session`; `state` is unchanged.
    pub fn start(
        &mut self,
        state: &SessionState,
        spec: SelectionSpec,
    ) -> Result<SessionState, QuizError> {
        let selection = self.select(spec)?;
        Ok(state.start(selection, self.clock.now())?)
    }

    /// # Errors
    ///
    /// See [`SessionState::select_answer`].
    pub fn answer(&self, state: &SessionState, option: &str) -> Result<SessionState, QuizError> {
        Ok(state.select_answer(option)?)
    }

    /// # Errors
    ///
    /// See [`SessionState::advance`].
    pub fn next(&self, state: &SessionState) -> Result<SessionState, QuizError> {
        Ok(state.advance()?)
    }

    /// # Errors
    ///
    /// See [`SessionState::retreat`].
    pub fn previous(&self, state: &SessionState) -> Result<SessionState, QuizError> {
        Ok(state.retreat()?)
    }

    /// # Errors
    ///
    /// See [`SessionState::finish`].
    pub fn finish(&self, state: &SessionState) -> Result<SessionState, QuizError> {
        Ok(state.finish(self.clock.now())?)
    }

    /// # Errors
    ///
    /// See [`SessionState::restart`].
    pub fn restart(&self, state: &SessionState) -> Result<SessionState, QuizError> {
        Ok(state.restart(self.clock.now())?)
    }

    #[must_use]
    pub fn back_to_setup(&self, state: &SessionState) -> SessionState {
        state.back_to_setup()
    }

    #[must_use]
    pub fn question_view(&self, state: &SessionState) -> Option<QuestionView> {
        QuestionView::from_state(state)
    }

    #[must_use]
    pub fn results_view(&self, state: &SessionState) -> Option<ResultsView> {
        ResultsView::from_state(state)
    }

    /// Browse the bank outside a quiz.
    #[must_use]
    pub fn browse(&self, filter: &BankFilter) -> Vec<Arc<Question>> {
        browse(self.bank.as_ref(), filter)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Storage` if no question has that index.
    pub fn question(&self, index: QuestionIndex) -> Result<Arc<Question>, QuizError> {
        Ok(self.bank.get(index)?)
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("clock", &self.clock)
            .field("bank_len", &self.bank.len())
            .finish_non_exhaustive()
    }
}
