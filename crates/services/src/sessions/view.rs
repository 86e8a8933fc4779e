use quiz_core::model::{QuestionIndex, QuestionReview, QuizResults, ScoreBand};

use super::state::{SessionPhase, SessionState};

//
// ─── QUESTION VIEW ─────────────────────────────────────────────────────────────
//

/// Everything a host needs to render the active question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub heading: String,
    pub number: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub index: QuestionIndex,
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub is_last: bool,
    /// Changes whenever a wrong answer is cleared; hosts can key widget state on it.
    pub attempt: u64,
}

impl QuestionView {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Option<Self> {
        let question = state.current_question()?;
        let progress = state.progress();
        Some(Self {
            heading: format!("Question {} of {}", progress.number, progress.total),
            number: progress.number,
            total: progress.total,
            progress_percent: progress.percent,
            index: question.index(),
            prompt: question.prompt().to_owned(),
            options: question
                .display_options()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            selected: state.selected_answer().map(str::to_owned),
            can_go_previous: state.can_go_previous(),
            can_go_next: state.can_go_next(),
            is_last: state.is_last_question(),
            attempt: state.attempt(),
        })
    }
}

//
// ─── RESULTS VIEW ──────────────────────────────────────────────────────────────
//

/// Results screen for a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub results: QuizResults,
    pub band: ScoreBand,
    pub first_attempt_correct: usize,
    pub elapsed_secs: Option<i64>,
    pub review: Vec<QuestionReview>,
}

impl ResultsView {
    /// Returns `None` unless the session is completed.
    #[must_use]
    pub fn from_state(state: &SessionState) -> Option<Self> {
        if state.phase() != SessionPhase::Completed {
            return None;
        }
        let results = state.results();
        Some(Self {
            results,
            band: results.band(),
            first_attempt_correct: state.first_attempt_correct(),
            elapsed_secs: state.elapsed().map(|d| d.num_seconds()),
            review: state.review(),
        })
    }
}
