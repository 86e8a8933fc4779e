//! Line-oriented terminal host driving a `QuizService`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use quiz_core::model::{AnswerOutcome, IndexRange};
use services::{QuestionView, QuizService, ResultsView, SessionPhase, SessionState, SetupForm};
use storage::BankFilter;

use crate::intent::{QuizIntent, ResultsIntent, SetupIntent};

const SETUP_HELP: &str = "\
Commands:
  range [<start> <end>]          quiz on questions start..=end (bounds are clamped to the bank)
  random <count> [<start> <end>] quiz on a random sample
  bank [<search>]                browse the question bank
  quit";

const QUIZ_HELP: &str =
    "Type an option number, n (next), p (previous), f (finish), q (back to setup).";

pub struct TerminalHost<R, W> {
    service: QuizService,
    form: SetupForm,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(service: QuizService, input: R, output: W) -> Self {
        let form = service.setup_form();
        Self {
            service,
            form,
            input,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Run until the user quits or input ends. Returns the final session state.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures; quiz errors are printed and the
    /// prompt repeats.
    pub fn run(&mut self) -> Result<SessionState> {
        let mut state = SessionState::new();
        self.render_setup()?;

        loop {
            let next = match state.phase() {
                SessionPhase::NotStarted => {
                    let Some(line) = self.read_line("setup> ")? else {
                        break;
                    };
                    match SetupIntent::parse(&line) {
                        Ok(SetupIntent::Quit) => break,
                        Ok(intent) => self.on_setup(&state, intent)?,
                        Err(err) => {
                            writeln!(self.output, "{err}")?;
                            None
                        }
                    }
                }
                SessionPhase::Active => {
                    let Some(line) = self.read_line("answer> ")? else {
                        break;
                    };
                    match QuizIntent::parse(&line) {
                        Ok(intent) => self.on_quiz(&state, intent)?,
                        Err(err) => {
                            writeln!(self.output, "{err}\n{QUIZ_HELP}")?;
                            None
                        }
                    }
                }
                SessionPhase::Completed => {
                    let Some(line) = self.read_line("results> ")? else {
                        break;
                    };
                    match ResultsIntent::parse(&line) {
                        Ok(ResultsIntent::Quit) => break,
                        Ok(intent) => Some(self.on_results(&state, intent)?),
                        Err(err) => {
                            writeln!(self.output, "{err}")?;
                            None
                        }
                    }
                }
            };

            if let Some(next) = next {
                state = next;
                if state.phase() == SessionPhase::NotStarted {
                    self.form = self.service.setup_form();
                }
                self.render(&state)?;
            }
        }

        Ok(state)
    }

    fn on_setup(
        &mut self,
        state: &SessionState,
        intent: SetupIntent,
    ) -> Result<Option<SessionState>> {
        let spec = match intent {
            SetupIntent::Range(bounds) => {
                if let Some(range) = bounds {
                    self.apply_bounds(range);
                }
                self.form.range_spec()
            }
            SetupIntent::Random { count, pool } => {
                if let Some(range) = pool {
                    self.apply_bounds(range);
                }
                self.form.random_spec(count, pool.is_some())
            }
            SetupIntent::Bank(search) => {
                self.render_bank(&search)?;
                return Ok(None);
            }
            SetupIntent::Help | SetupIntent::Quit => {
                writeln!(self.output, "{SETUP_HELP}")?;
                return Ok(None);
            }
        };
        let spec = match spec {
            Ok(spec) => spec,
            Err(err) => {
                writeln!(self.output, "{err}")?;
                return Ok(None);
            }
        };

        match self.service.start(state, spec) {
            Ok(next) if next.phase() == SessionPhase::Active => Ok(Some(next)),
            Ok(_) => {
                writeln!(self.output, "no questions selected")?;
                Ok(None)
            }
            Err(err) => {
                writeln!(self.output, "{err}")?;
                Ok(None)
            }
        }
    }

    /// End first, so a start past the end stays inverted and is reported.
    fn apply_bounds(&mut self, range: IndexRange) {
        self.form.set_end(range.end);
        self.form.set_start(range.start);
    }

    fn on_quiz(
        &mut self,
        state: &SessionState,
        intent: QuizIntent,
    ) -> Result<Option<SessionState>> {
        let result = match intent {
            QuizIntent::Answer(number) => {
                let option = self.service.question_view(state).and_then(|view| {
                    let slot = number.checked_sub(1)?;
                    view.options.get(slot).cloned()
                });
                let Some(option) = option else {
                    writeln!(self.output, "no option {number}")?;
                    return Ok(None);
                };
                self.service.answer(state, &option)
            }
            QuizIntent::Next => self.service.next(state),
            QuizIntent::Previous => self.service.previous(state),
            QuizIntent::Finish => self.service.finish(state),
            QuizIntent::Abandon => Ok(self.service.back_to_setup(state)),
        };

        match result {
            Ok(next) => Ok(Some(next)),
            Err(err) => {
                writeln!(self.output, "{err}")?;
                Ok(None)
            }
        }
    }

    fn on_results(&mut self, state: &SessionState, intent: ResultsIntent) -> Result<SessionState> {
        match intent {
            ResultsIntent::Retake => match self.service.restart(state) {
                Ok(next) => Ok(next),
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    Ok(state.clone())
                }
            },
            ResultsIntent::NewQuiz | ResultsIntent::Quit => Ok(self.service.back_to_setup(state)),
        }
    }

    //
    // ─── RENDERING ─────────────────────────────────────────────────────────────
    //

    fn render(&mut self, state: &SessionState) -> Result<()> {
        match state.phase() {
            SessionPhase::NotStarted => self.render_setup(),
            SessionPhase::Active => match self.service.question_view(state) {
                Some(view) => self.render_question(&view),
                None => Ok(()),
            },
            SessionPhase::Completed => match self.service.results_view(state) {
                Some(view) => self.render_results(&view),
                None => Ok(()),
            },
        }
    }

    fn render_setup(&mut self) -> Result<()> {
        let form = self.form;
        writeln!(
            self.output,
            "\n{} questions in the bank. Current range: {}..={}",
            form.total(),
            form.start(),
            form.end()
        )?;
        writeln!(self.output, "{SETUP_HELP}")?;
        Ok(())
    }

    fn render_bank(&mut self, search: &str) -> Result<()> {
        let found = self.service.browse(&BankFilter::search(search));
        if found.is_empty() {
            writeln!(self.output, "no questions match {search:?}")?;
        }
        for question in found {
            writeln!(self.output, "{:>4}. {}", question.index(), question.prompt())?;
            writeln!(self.output, "      answer: {}", question.correct_option())?;
        }
        Ok(())
    }

    fn render_question(&mut self, view: &QuestionView) -> Result<()> {
        writeln!(
            self.output,
            "\n{} ({}%)\n{}",
            view.heading, view.progress_percent, view.prompt
        )?;
        for (i, option) in view.options.iter().enumerate() {
            let marker = if view.selected.as_deref() == Some(option.as_str()) {
                '*'
            } else {
                ' '
            };
            writeln!(self.output, " {marker} {}. {option}", i + 1)?;
        }
        let hint = if view.is_last {
            "last question: f to finish"
        } else if view.selected.is_some() {
            "answer selected"
        } else {
            "select an answer"
        };
        writeln!(self.output, "({hint})")?;
        Ok(())
    }

    fn render_results(&mut self, view: &ResultsView) -> Result<()> {
        let r = &view.results;
        writeln!(
            self.output,
            "\nQuiz completed: {}% ({:?})\n{} of {} correct, {} incorrect, {} skipped ({} attempted)",
            r.percentage, view.band, r.correct, r.total, r.incorrect, r.skipped, r.attempted
        )?;
        writeln!(
            self.output,
            "Right on the first try: {}",
            view.first_attempt_correct
        )?;
        if let Some(secs) = view.elapsed_secs {
            writeln!(self.output, "Time taken: {secs}s")?;
        }
        for (n, line) in view.review.iter().enumerate() {
            let verdict = match &line.outcome {
                AnswerOutcome::Correct => "correct".to_owned(),
                AnswerOutcome::Incorrect { given } => {
                    format!("you answered {given:?}, correct is {:?}", line.correct_option)
                }
                AnswerOutcome::Skipped => format!("skipped, correct is {:?}", line.correct_option),
            };
            writeln!(self.output, "{:>3}. {} - {verdict}", n + 1, line.prompt)?;
        }
        writeln!(self.output, "r: retake, s: new quiz, quit")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::SelectionSpec;
    use quiz_core::time::fixed_now;
    use services::Clock;
    use std::io::Cursor;
    use std::sync::Arc;

    const BANK: &str = r#"[
        {"index": 1, "question": "One?", "options": ["yes", "no"], "answer": "yes"},
        {"index": 2, "question": "Two?", "options": ["yes", "no"], "answer": "yes"},
        {"index": 3, "question": "Three?", "options": ["yes", "no"], "answer": "yes"}
    ]"#;

    fn host(script: &str) -> TerminalHost<Cursor<Vec<u8>>, Vec<u8>> {
        let bank = storage::parse_bank(BANK).unwrap();
        let service = QuizService::new(Clock::fixed(fixed_now()), Arc::new(bank)).with_seed(5);
        TerminalHost::new(service, Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn output(host: &TerminalHost<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(host.output().clone()).unwrap()
    }

    #[test]
    fn finishing_without_answers_counts_all_skipped() {
        let mut host = host("range 1 3\nf\n");
        let state = host.run().unwrap();

        assert_eq!(state.phase(), SessionPhase::Completed);
        let out = output(&host);
        assert!(out.contains("Question 1 of 3"));
        assert!(out.contains("0 of 3 correct, 0 incorrect, 3 skipped"));
    }

    #[test]
    fn invalid_range_is_reported_and_setup_continues() {
        let mut host = host("range 3 2\nbank two\nquit\n");
        let state = host.run().unwrap();

        assert_eq!(state.phase(), SessionPhase::NotStarted);
        let out = output(&host);
        assert!(out.contains("invalid range 3..=2"));
        assert!(out.contains("2. Two?"));
    }

    #[test]
    fn range_end_past_the_bank_is_clamped() {
        let mut host = host("range 2 9\nf\n");
        let state = host.run().unwrap();

        assert_eq!(state.phase(), SessionPhase::Completed);
        assert_eq!(state.spec(), SelectionSpec::Range { start: 2, end: 3 });
        let out = output(&host);
        assert!(out.contains("Question 1 of 2"));
        assert!(out.contains("0 of 2 correct"));
    }

    #[test]
    fn random_pool_comes_from_the_setup_form() {
        let mut host = host("random 3 1 2\nrandom 2 1 2\n");
        let state = host.run().unwrap();

        assert!(output(&host).contains("requested 3 questions but only 2 are available"));
        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(
            state.spec(),
            SelectionSpec::Random {
                count: 2,
                pool: Some(IndexRange::new(1, 2))
            }
        );
    }

    #[test]
    fn new_quiz_restores_default_bounds() {
        let mut host = host("range 2 3\nf\ns\nrange\n");
        let state = host.run().unwrap();

        assert_eq!(state.spec(), SelectionSpec::Range { start: 1, end: 3 });
    }

    #[test]
    fn unknown_option_number_is_rejected() {
        let mut host = host("range 1 1\n7\nq\nquit\n");
        let state = host.run().unwrap();

        assert_eq!(state.phase(), SessionPhase::NotStarted);
        assert!(output(&host).contains("no option 7"));
    }

    #[test]
    fn retake_returns_to_first_question() {
        let mut host = host("random 2\nf\nr\n");
        let state = host.run().unwrap();

        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(state.position(), 0);
        assert_eq!(state.queue_len(), 2);
    }
}
