//! Parsing of typed commands into per-screen intents.

use quiz_core::model::IndexRange;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),
    #[error("{command} expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },
    #[error("not a number: {0}")]
    NotANumber(String),
}

/// Commands accepted on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupIntent {
    /// `range [<start> <end>]`; without bounds the current form values are used.
    Range(Option<IndexRange>),
    /// `random <count> [<start> <end>]`
    Random {
        count: usize,
        pool: Option<IndexRange>,
    },
    /// `bank [<search>]`
    Bank(String),
    Help,
    Quit,
}

/// Commands accepted while a question is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizIntent {
    /// 1-based option number as displayed.
    Answer(usize),
    Next,
    Previous,
    Finish,
    Abandon,
}

/// Commands accepted on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsIntent {
    Retake,
    NewQuiz,
    Quit,
}

fn number<T: std::str::FromStr>(raw: &str) -> Result<T, IntentError> {
    raw.parse().map_err(|_| IntentError::NotANumber(raw.to_owned()))
}

fn bounds(start: &str, end: &str) -> Result<IndexRange, IntentError> {
    Ok(IndexRange::new(number(start)?, number(end)?))
}

impl SetupIntent {
    /// # Errors
    ///
    /// Returns `IntentError` for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Self, IntentError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Help);
        };
        let args: Vec<&str> = words.collect();

        match command {
            "range" => match args.as_slice() {
                [] => Ok(Self::Range(None)),
                [start, end] => Ok(Self::Range(Some(bounds(start, end)?))),
                _ => Err(IntentError::Usage {
                    command: "range",
                    expected: "no arguments or <start> <end>",
                }),
            },
            "random" => match args.as_slice() {
                [count] => Ok(Self::Random {
                    count: number(count)?,
                    pool: None,
                }),
                [count, start, end] => Ok(Self::Random {
                    count: number(count)?,
                    pool: Some(bounds(start, end)?),
                }),
                _ => Err(IntentError::Usage {
                    command: "random",
                    expected: "<count> [<start> <end>]",
                }),
            },
            "bank" => Ok(Self::Bank(args.join(" "))),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(IntentError::Unknown(other.to_owned())),
        }
    }
}

impl QuizIntent {
    /// # Errors
    ///
    /// Returns `IntentError::Unknown` for anything that is not a command or option
    /// number.
    pub fn parse(line: &str) -> Result<Self, IntentError> {
        let line = line.trim();
        match line {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "f" | "finish" => Ok(Self::Finish),
            "q" | "quit" => Ok(Self::Abandon),
            other => other
                .parse::<usize>()
                .map(Self::Answer)
                .map_err(|_| IntentError::Unknown(other.to_owned())),
        }
    }
}

impl ResultsIntent {
    /// # Errors
    ///
    /// Returns `IntentError::Unknown` for unrecognised input.
    pub fn parse(line: &str) -> Result<Self, IntentError> {
        match line.trim() {
            "r" | "retake" => Ok(Self::Retake),
            "s" | "setup" | "new" => Ok(Self::NewQuiz),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(IntentError::Unknown(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_setup_commands() {
        assert_eq!(SetupIntent::parse("range").unwrap(), SetupIntent::Range(None));
        assert_eq!(
            SetupIntent::parse("range 2 7").unwrap(),
            SetupIntent::Range(Some(IndexRange::new(2, 7)))
        );
        assert_eq!(
            SetupIntent::parse("random 3 1 5").unwrap(),
            SetupIntent::Random {
                count: 3,
                pool: Some(IndexRange::new(1, 5))
            }
        );
        assert_eq!(
            SetupIntent::parse("bank smart pointer").unwrap(),
            SetupIntent::Bank("smart pointer".into())
        );
        assert_eq!(SetupIntent::parse("   ").unwrap(), SetupIntent::Help);
    }

    #[test]
    fn rejects_malformed_setup_commands() {
        assert_eq!(
            SetupIntent::parse("range x 3").unwrap_err(),
            IntentError::NotANumber("x".into())
        );
        assert!(matches!(
            SetupIntent::parse("random"),
            Err(IntentError::Usage { command: "random", .. })
        ));
        assert!(matches!(
            SetupIntent::parse("launch"),
            Err(IntentError::Unknown(_))
        ));
    }

    #[test]
    fn parses_quiz_and_results_commands() {
        assert_eq!(QuizIntent::parse("2\n").unwrap(), QuizIntent::Answer(2));
        assert_eq!(QuizIntent::parse("n").unwrap(), QuizIntent::Next);
        assert_eq!(QuizIntent::parse("previous").unwrap(), QuizIntent::Previous);
        assert_eq!(QuizIntent::parse("f").unwrap(), QuizIntent::Finish);
        assert!(QuizIntent::parse("maybe").is_err());

        assert_eq!(ResultsIntent::parse("r").unwrap(), ResultsIntent::Retake);
        assert_eq!(ResultsIntent::parse("s").unwrap(), ResultsIntent::NewQuiz);
        assert!(ResultsIntent::parse("x").is_err());
    }
}
