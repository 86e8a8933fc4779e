mod ids;
mod question;
mod results;
mod selection;

pub use ids::{ParseIndexError, QuestionIndex};
pub use question::{Question, QuestionError};
pub use results::{
    AnswerMap, AnswerOutcome, QuestionReview, QuizResults, ScoreBand, review, rounded_percentage,
    score,
};
pub use selection::{DEFAULT_RANGE_END, IndexRange, Selection, SelectionError, SelectionSpec};
