use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use services::{Clock, QuizService};
use storage::{InMemoryRepository, load_bank, parse_bank};

mod host;
mod intent;
mod logging;

use host::TerminalHost;
use logging::LogFormat;

const SAMPLE_BANK: &str = include_str!("../data/sample_questions.json");

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz in the terminal")]
struct Args {
    /// Question bank JSON file; the bundled sample bank is used when omitted
    #[arg(long, env = "QUIZ_BANK_PATH")]
    bank: Option<PathBuf>,

    /// Seed for random question sampling
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,

    /// Write logs to stderr as JSON
    #[arg(long)]
    log_json: bool,
}

fn open_bank(path: Option<&PathBuf>) -> Result<InMemoryRepository> {
    match path {
        Some(path) => load_bank(path)
            .with_context(|| format!("could not load question bank {}", path.display())),
        None => parse_bank(SAMPLE_BANK).context("bundled sample bank is invalid"),
    }
}

fn run(args: Args) -> Result<()> {
    let bank = open_bank(args.bank.as_ref())?;
    let mut service = QuizService::new(Clock::default(), Arc::new(bank));
    if let Some(seed) = args.seed {
        service = service.with_seed(seed);
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut host = TerminalHost::new(service, stdin.lock(), stdout.lock());
    host.run()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    logging::init(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    });

    if let Err(err) = run(args) {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
