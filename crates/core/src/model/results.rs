use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::model::ids::QuestionIndex;
use crate::model::question::Question;

/// Chosen option per question index.
pub type AnswerMap = BTreeMap<QuestionIndex, String>;

//
// ─── SCORE BAND ────────────────────────────────────────────────────────────────
//

/// Coarse rating of a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 80% and above.
    Excellent,
    /// 60% to 79%.
    Fair,
    Poor,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Self::Excellent,
            60..=79 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Aggregate outcome of a quiz.
///
/// `correct + incorrect + skipped == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResults {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    pub attempted: usize,
    pub percentage: u8,
}

impl QuizResults {
    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage)
    }
}

/// Score `answers` against the selected questions.
///
/// Only the selected set counts: answers for indices outside it are ignored, and a
/// question repeated in `questions` is scored once.
#[must_use]
pub fn score(questions: &[Arc<Question>], answers: &AnswerMap) -> QuizResults {
    let mut seen = HashSet::with_capacity(questions.len());
    let mut total = 0_usize;
    let mut attempted = 0_usize;
    let mut correct = 0_usize;

    for question in questions {
        if !seen.insert(question.index()) {
            continue;
        }
        total += 1;
        if let Some(given) = answers.get(&question.index()) {
            attempted += 1;
            if question.is_correct(given) {
                correct += 1;
            }
        }
    }

    QuizResults {
        total,
        correct,
        incorrect: attempted - correct,
        skipped: total - attempted,
        attempted,
        percentage: rounded_percentage(correct, total),
    }
}

/// `round(100 * part / whole)` with halves rounded up; zero when `whole` is zero.
#[must_use]
pub fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let pct = (200 * part + whole) / (2 * whole);
    u8::try_from(pct).unwrap_or(100)
}

//
// ─── DETAILED REVIEW ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect { given: String },
    Skipped,
}

/// One line of the post-quiz review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub index: QuestionIndex,
    pub prompt: String,
    pub correct_option: String,
    pub outcome: AnswerOutcome,
}

/// Per-question outcomes, in selection order.
#[must_use]
pub fn review(questions: &[Arc<Question>], answers: &AnswerMap) -> Vec<QuestionReview> {
    let mut seen = HashSet::with_capacity(questions.len());
    questions
        .iter()
        .filter(|q| seen.insert(q.index()))
        .map(|q| {
            let outcome = match answers.get(&q.index()) {
                Some(given) if q.is_correct(given) => AnswerOutcome::Correct,
                Some(given) => AnswerOutcome::Incorrect {
                    given: given.clone(),
                },
                None => AnswerOutcome::Skipped,
            };
            QuestionReview {
                index: q.index(),
                prompt: q.prompt().to_owned(),
                correct_option: q.correct_option().to_owned(),
                outcome,
            }
        })
        .collect()
}
