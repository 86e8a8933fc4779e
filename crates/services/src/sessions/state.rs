use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use quiz_core::model::{
    AnswerMap, Question, QuestionIndex, QuestionReview, QuizResults, Selection, SelectionSpec,
    review, rounded_percentage, score,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

/// How far ahead of the cursor a mis-answered question is re-inserted.
pub const REQUEUE_DISTANCE: usize = 3;

//
// ─── PHASE & ACTIONS ───────────────────────────────────────────────────────────
//

/// Which view of the quiz is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Active,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::Active => "active",
            SessionPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Transitions that can be rejected, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    SelectAnswer,
    Advance,
    Retreat,
    Finish,
    Restart,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionAction::Start => "start",
            SessionAction::SelectAnswer => "select an answer",
            SessionAction::Advance => "advance",
            SessionAction::Retreat => "go back",
            SessionAction::Finish => "finish",
            SessionAction::Restart => "restart",
        };
        f.write_str(label)
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Snapshot of a quiz session.
///
/// Every transition borrows the current snapshot and returns a new one, so a host
/// can keep the previous value when a transition is rejected. While `Active`,
/// `position < queue.len()` holds; a snapshot that would break it falls back to
/// `NotStarted` instead.
///
/// `queue` is the working traversal order and may hold the same question more than
/// once after a requeue. `selection` is the set chosen at `start` and is what gets
/// scored. `answers` tracks the latest attempt per index while `score_record`
/// keeps the outcome of the first answer to each index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    phase: SessionPhase,
    spec: SelectionSpec,
    selection: Vec<Arc<Question>>,
    queue: Vec<Arc<Question>>,
    position: usize,
    answers: AnswerMap,
    score_record: BTreeMap<QuestionIndex, bool>,
    attempt: u64,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// A fresh, not-started session with default setup bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn require(&self, action: SessionAction, phase: SessionPhase) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    /// Fall back to `NotStarted` if an active cursor points outside the queue.
    #[must_use]
    pub fn settle(self) -> Self {
        if self.phase == SessionPhase::Active && self.position >= self.queue.len() {
            tracing::warn!(
                position = self.position,
                queue_len = self.queue.len(),
                "no current question, returning to setup"
            );
            return self.back_to_setup();
        }
        self
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Begin a quiz over `selection`.
    ///
    /// An empty selection cannot be traversed and yields a not-started session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `NotStarted`.
    pub fn start(
        &self,
        selection: Selection,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        self.require(SessionAction::Start, SessionPhase::NotStarted)?;

        let spec = selection.spec();
        let questions = selection.into_questions();
        tracing::info!(?spec, questions = questions.len(), "quiz started");

        let next = Self {
            phase: SessionPhase::Active,
            spec,
            queue: questions.clone(),
            selection: questions,
            position: 0,
            answers: AnswerMap::new(),
            score_record: BTreeMap::new(),
            attempt: self.attempt,
            started_at: Some(started_at),
            completed_at: None,
        };
        Ok(next.settle())
    }

    /// Record `option` for the current question.
    ///
    /// The first answer to an index is written to the score record and never
    /// changes afterwards. Every wrong answer re-inserts the question
    /// [`REQUEUE_DISTANCE`] slots ahead, clamped to the end of the queue.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless `Active`, and
    /// `SessionError::UnknownOption` if the question does not offer `option`.
    pub fn select_answer(&self, option: &str) -> Result<Self, SessionError> {
        self.require(SessionAction::SelectAnswer, SessionPhase::Active)?;
        let Some(current) = self.current_question().cloned() else {
            return Ok(self.back_to_setup());
        };
        if !current.has_option(option) {
            return Err(SessionError::UnknownOption(option.to_owned()));
        }

        let mut next = self.clone();
        let index = current.index();
        let correct = current.is_correct(option);

        next.answers.insert(index, option.to_owned());
        next.score_record.entry(index).or_insert(correct);

        if !correct {
            let at = (next.position + REQUEUE_DISTANCE).min(next.queue.len());
            next.queue.insert(at, Arc::clone(&current));
            tracing::debug!(%index, at, queue_len = next.queue.len(), "requeued question");
        }

        Ok(next)
    }

    /// Move to the next slot in the queue.
    ///
    /// A wrong answer on the current question is cleared first so the question is
    /// answered afresh when it comes round again; this bumps the attempt token.
    /// The cursor stays put on the last slot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless `Active`.
    pub fn advance(&self) -> Result<Self, SessionError> {
        self.require(SessionAction::Advance, SessionPhase::Active)?;
        let Some(current) = self.current_question().cloned() else {
            return Ok(self.back_to_setup());
        };

        let mut next = self.clone();
        let index = current.index();
        if next
            .answers
            .get(&index)
            .is_some_and(|given| !current.is_correct(given))
        {
            next.answers.remove(&index);
            next.attempt += 1;
        }
        if next.position + 1 < next.queue.len() {
            next.position += 1;
        }
        Ok(next.settle())
    }

    /// Move to the previous slot, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless `Active`.
    pub fn retreat(&self) -> Result<Self, SessionError> {
        self.require(SessionAction::Retreat, SessionPhase::Active)?;
        let mut next = self.clone();
        next.position = next.position.saturating_sub(1);
        Ok(next.settle())
    }

    /// Close the quiz and show results.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless `Active`.
    pub fn finish(&self, completed_at: DateTime<Utc>) -> Result<Self, SessionError> {
        self.require(SessionAction::Finish, SessionPhase::Active)?;
        let mut next = self.clone();
        next.phase = SessionPhase::Completed;
        next.completed_at = Some(completed_at);
        tracing::info!(answered = next.answers.len(), "quiz finished");
        Ok(next)
    }

    /// Retake the same selection from the top, discarding requeues and answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless `Completed`.
    pub fn restart(&self, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        self.require(SessionAction::Restart, SessionPhase::Completed)?;
        let next = Self {
            phase: SessionPhase::Active,
            spec: self.spec,
            selection: self.selection.clone(),
            queue: self.selection.clone(),
            position: 0,
            answers: AnswerMap::new(),
            score_record: BTreeMap::new(),
            attempt: self.attempt,
            started_at: Some(started_at),
            completed_at: None,
        };
        Ok(next.settle())
    }

    /// Abandon everything and return to setup with default bounds. Only the
    /// attempt token survives.
    #[must_use]
    pub fn back_to_setup(&self) -> Self {
        tracing::debug!(phase = %self.phase, "back to setup");
        Self {
            attempt: self.attempt,
            ..Self::default()
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != SessionPhase::NotStarted
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// The bounds or sampling used for the current selection.
    #[must_use]
    pub fn spec(&self) -> SelectionSpec {
        self.spec
    }

    /// Questions chosen at start, before any requeue.
    #[must_use]
    pub fn selection(&self) -> &[Arc<Question>] {
        &self.selection
    }

    /// The working queue, including requeued copies.
    #[must_use]
    pub fn queue(&self) -> &[Arc<Question>] {
        &self.queue
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// First-answer correctness per index.
    #[must_use]
    pub fn score_record(&self) -> &BTreeMap<QuestionIndex, bool> {
        &self.score_record
    }

    /// Token bumped whenever a wrong answer is cleared on advance.
    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.completed_at? - self.started_at?)
    }

    /// The question under the cursor, or `None` outside an active session.
    #[must_use]
    pub fn current_question(&self) -> Option<&Arc<Question>> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.queue.get(self.position)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        let current = self.current_question()?;
        self.answers.get(&current.index()).map(String::as_str)
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.phase == SessionPhase::Active && self.position > 0
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.phase == SessionPhase::Active && self.position + 1 < self.queue.len()
    }

    /// True on the final slot, where hosts offer Finish instead of Next.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.phase == SessionPhase::Active && self.position + 1 == self.queue.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.queue.len();
        let number = if total == 0 { 0 } else { self.position + 1 };
        SessionProgress {
            number,
            total,
            answered: self.answers.len(),
            percent: rounded_percentage(number, total),
            is_complete: self.is_completed(),
        }
    }

    /// Score the original selection against the current answers.
    #[must_use]
    pub fn results(&self) -> QuizResults {
        score(&self.selection, &self.answers)
    }

    #[must_use]
    pub fn review(&self) -> Vec<QuestionReview> {
        review(&self.selection, &self.answers)
    }

    /// Number of questions whose first answer was correct.
    #[must_use]
    pub fn first_attempt_correct(&self) -> usize {
        self.score_record.values().filter(|&&ok| ok).count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::selector::select_range;
    use quiz_core::time::fixed_now;

    fn bank(size: u32) -> Vec<Arc<Question>> {
        (1..=size)
            .map(|i| {
                Arc::new(
                    Question::new(
                        QuestionIndex::new(i),
                        format!("Q{i}"),
                        vec!["right".into(), "wrong".into(), "other".into()],
                        "right",
                    )
                    .unwrap(),
                )
            })
            .collect()
    }

    fn started(start: u32, end: u32) -> SessionState {
        let selection = select_range(&bank(5), start, end).unwrap();
        SessionState::new().start(selection, fixed_now()).unwrap()
    }

    fn queue_indices(state: &SessionState) -> Vec<u32> {
        state.queue().iter().map(|q| q.index().value()).collect()
    }

    #[test]
    fn wrong_answer_requeues_at_end_and_advance_clears_it() {
        let state = started(1, 3);
        assert_eq!(queue_indices(&state), vec![1, 2, 3]);

        let state = state.select_answer("wrong").unwrap();
        assert_eq!(queue_indices(&state), vec![1, 2, 3, 1]);
        assert_eq!(state.selected_answer(), Some("wrong"));

        let state = state.advance().unwrap();
        assert_eq!(state.position(), 1);
        assert_eq!(state.current_question().unwrap().index().value(), 2);
        assert!(!state.answers().contains_key(&QuestionIndex::new(1)));
        assert_eq!(state.attempt(), 1);
        assert_eq!(state.score_record().get(&QuestionIndex::new(1)), Some(&false));
    }

    #[test]
    fn requeue_lands_three_slots_ahead() {
        let state = started(1, 5);
        let state = state.select_answer("wrong").unwrap();
        assert_eq!(queue_indices(&state), vec![1, 2, 3, 1, 4, 5]);
    }

    #[test]
    fn correct_answer_does_not_requeue() {
        let state = started(1, 3).select_answer("right").unwrap();
        assert_eq!(queue_indices(&state), vec![1, 2, 3]);
        assert_eq!(state.score_record().get(&QuestionIndex::new(1)), Some(&true));
    }

    #[test]
    fn every_wrong_answer_requeues_another_copy() {
        let state = started(1, 3).select_answer("wrong").unwrap();
        assert_eq!(state.queue_len(), 4);

        let state = state.select_answer("other").unwrap();
        assert_eq!(queue_indices(&state), vec![1, 2, 3, 1, 1]);
        assert_eq!(state.score_record().get(&QuestionIndex::new(1)), Some(&false));

        let state = state.select_answer("right").unwrap();
        assert_eq!(state.queue_len(), 5);
    }

    #[test]
    fn score_record_keeps_first_outcome_across_requeue() {
        let mut state = started(1, 2).select_answer("wrong").unwrap();
        assert_eq!(queue_indices(&state), vec![1, 2, 1]);

        state = state.advance().unwrap();
        state = state.select_answer("right").unwrap();
        state = state.advance().unwrap();
        assert_eq!(state.position(), 2);
        state = state.select_answer("right").unwrap();

        assert_eq!(state.score_record().get(&QuestionIndex::new(1)), Some(&false));
        assert_eq!(state.answers().get(&QuestionIndex::new(1)).unwrap(), "right");
        assert_eq!(state.first_attempt_correct(), 1);
        assert_eq!(state.results().correct, 2);
    }

    #[test]
    fn advance_keeps_correct_answer_and_stops_at_end() {
        let mut state = started(1, 2).select_answer("right").unwrap();
        state = state.advance().unwrap();
        assert_eq!(state.selected_answer(), None);
        assert!(state.is_last_question());

        let again = state.advance().unwrap();
        assert_eq!(again.position(), 1);
        assert_eq!(again.answers().get(&QuestionIndex::new(1)).unwrap(), "right");
    }

    #[test]
    fn retreat_moves_back_without_touching_answers() {
        let state = started(1, 3).select_answer("right").unwrap();
        let state = state.advance().unwrap().select_answer("wrong").unwrap();
        let back = state.retreat().unwrap();

        assert_eq!(back.position(), 0);
        assert_eq!(back.answers(), state.answers());
        assert_eq!(back.queue(), state.queue());

        let still = back.retreat().unwrap();
        assert_eq!(still.position(), 0);
        assert!(!still.can_go_previous());
    }

    #[test]
    fn transitions_are_rejected_outside_their_phase() {
        let idle = SessionState::new();
        assert_eq!(
            idle.advance().unwrap_err(),
            SessionError::InvalidTransition {
                action: SessionAction::Advance,
                phase: SessionPhase::NotStarted,
            }
        );
        assert!(idle.select_answer("right").is_err());
        assert!(idle.finish(fixed_now()).is_err());

        let active = started(1, 2);
        assert!(active.restart(fixed_now()).is_err());
        assert!(active.start(select_range(&bank(5), 1, 1).unwrap(), fixed_now()).is_err());

        let done = active.finish(fixed_now()).unwrap();
        assert!(done.select_answer("right").is_err());
        assert!(done.advance().is_err());
        assert!(done.retreat().is_err());
        assert!(done.current_question().is_none());
    }

    #[test]
    fn unknown_option_is_rejected_and_state_kept() {
        let state = started(1, 2);
        let err = state.select_answer("nope").unwrap_err();
        assert_eq!(err, SessionError::UnknownOption("nope".into()));
        assert!(state.answers().is_empty());
    }

    #[test]
    fn transitions_do_not_mutate_their_input() {
        let state = started(1, 3);
        let before = state.clone();
        let _ = state.select_answer("wrong").unwrap();
        let _ = state.advance().unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn restart_restores_original_selection() {
        let state = started(1, 3).select_answer("wrong").unwrap();
        let done = state.advance().unwrap().finish(fixed_now()).unwrap();
        assert_eq!(done.queue_len(), 4);

        let again = done.restart(fixed_now()).unwrap();
        assert_eq!(again.phase(), SessionPhase::Active);
        assert_eq!(queue_indices(&again), vec![1, 2, 3]);
        assert_eq!(again.position(), 0);
        assert!(again.answers().is_empty());
        assert!(again.score_record().is_empty());
    }

    #[test]
    fn back_to_setup_resets_everything() {
        let state = started(2, 4).select_answer("right").unwrap();
        let reset = state.back_to_setup();
        assert_eq!(reset, SessionState::new());
        assert_eq!(reset.spec(), SelectionSpec::default());
        assert!(!reset.is_started());
    }

    #[test]
    fn attempt_token_survives_back_to_setup() {
        let state = started(1, 3)
            .select_answer("wrong")
            .unwrap()
            .advance()
            .unwrap();
        assert_eq!(state.attempt(), 1);

        let reset = state.back_to_setup();
        assert_eq!(reset.phase(), SessionPhase::NotStarted);
        assert_eq!(reset.attempt(), 1);
        assert!(reset.queue().is_empty());

        let selection = select_range(&bank(5), 1, 2).unwrap();
        let again = reset.start(selection, fixed_now()).unwrap();
        assert_eq!(again.attempt(), 1);
    }

    #[test]
    fn empty_selection_falls_back_to_not_started() {
        let empty = Selection::new(SelectionSpec::Range { start: 1, end: 1 }, Vec::new());
        let state = SessionState::new().start(empty, fixed_now()).unwrap();
        assert_eq!(state.phase(), SessionPhase::NotStarted);
        assert!(state.current_question().is_none());
    }

    #[test]
    fn results_score_selection_not_queue() {
        let state = started(1, 4)
            .select_answer("right")
            .unwrap()
            .advance()
            .unwrap()
            .select_answer("right")
            .unwrap()
            .advance()
            .unwrap()
            .select_answer("wrong")
            .unwrap();
        let done = state.finish(fixed_now()).unwrap();

        let results = done.results();
        assert_eq!(results.total, 4);
        assert_eq!(results.correct, 2);
        assert_eq!(results.incorrect, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.percentage, 50);
        assert_eq!(done.elapsed(), Some(Duration::zero()));
    }

    #[test]
    fn progress_reports_slot_number() {
        let state = started(1, 4).select_answer("right").unwrap();
        let progress = state.advance().unwrap().progress();
        assert_eq!(progress.number, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.percent, 50);
        assert!(!progress.is_complete);
    }
}
