use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use wordle_advisor::advisor::context::Phase;
use wordle_advisor::advisor::{Advisor, AdvisorConfig, FixedTurnState, N_SUGGESTIONS};
use wordle_advisor::game::Wordle;
use wordle_advisor::solver::{data, likely_coloring, possible_answers};
use wordle_advisor::wordle::{Guess, History, Word};

mod tui;

const MAX_TOP_K: u64 = 64;

#[derive(Parser, Debug)]
#[command(version, about = "Live next-guess advice for five letter word puzzles")]
struct Cli {
    /// Word list with one word per line, the built-in list is used when omitted
    #[arg(long, global = true)]
    words: Option<PathBuf>,

    /// Number of scoring threads, defaults to the available parallelism
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Number of suggestions to keep
    #[arg(
        long,
        global = true,
        default_value_t = N_SUGGESTIONS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_TOP_K),
    )]
    top_k: usize,

    /// Seed for shuffling the word list before scoring
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a round in the terminal with live suggestions
    Play {
        /// The hidden answer, picked at random when omitted
        #[arg(long)]
        answer: Option<Word>,
    },
    /// Print the best next guesses for the given guesses
    Suggest {
        /// A guess and its colors, e.g. crane:gxyxx (g = correct, y = present, x = absent)
        #[arg(long = "guess")]
        guesses: Vec<Guess>,
    },
}

impl Cli {
    fn advisor_config(&self) -> AdvisorConfig {
        let default = AdvisorConfig::default();
        AdvisorConfig {
            threads: self.threads.unwrap_or(default.threads),
            top_k: self.top_k,
            seed: self.seed,
            ..default
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let words = match &cli.words {
        Some(path) => data::load(path),
        None => data::default_words(),
    }
    .map_err(|err| eyre!("{err:#}"))?;
    let config = cli.advisor_config();

    match cli.command {
        Command::Play { answer } => play(words, answer, config).await,
        Command::Suggest { guesses } => suggest(words, guesses, config).await,
    }
}

async fn play(words: Arc<[Word]>, answer: Option<Word>, config: AdvisorConfig) -> Result<()> {
    let game = match answer {
        Some(answer) => Wordle::new(words, answer)?,
        None => Wordle::random(words)?,
    };
    let mut app = tui::App::init(game, config)?;

    tui::initialize_panic_handler();
    let mut terminal = tui::init()?;
    let app_result = app.run(&mut terminal).await;
    tui::restore()?;
    Ok(app_result?)
}

async fn suggest(words: Arc<[Word]>, guesses: Vec<Guess>, config: AdvisorConfig) -> Result<()> {
    let history: History = guesses.into();
    for guess in history.guesses() {
        println!("{guess}");
    }
    if history.is_over() {
        println!("The puzzle is over, there is nothing left to suggest.");
        return Ok(());
    }
    let remaining = {
        let (words, history) = (Arc::clone(&words), history.clone());
        tokio::task::spawn_blocking(move || possible_answers(&words, &history)).await?
    };
    println!("{} possible answers", remaining.len().to_string().bold());

    let top_k = config.top_k;
    let mut advisor = Advisor::spawn(Arc::new(FixedTurnState::new(words, history)), config)?;
    advisor.request_computation_for_current_state();

    let bar = ProgressBar::new(1000);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {wide_bar} {percent}%",
    )?);
    let phase = loop {
        bar.set_position((advisor.snapshot_progress() * 1000.0) as u64);
        match advisor.snapshot_phase() {
            phase @ (Phase::Complete | Phase::Failed | Phase::Cancelled) => break phase,
            _ => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    };
    bar.finish_and_clear();
    advisor.cancel_all().await;

    match phase {
        Phase::Failed => return Err(eyre!("no word in the list is consistent with these guesses")),
        Phase::Cancelled => return Err(eyre!("the computation was cancelled")),
        _ => {}
    }
    let suggestions = advisor.snapshot_suggestions().display_list(top_k);
    let likely = tokio::task::spawn_blocking(move || {
        suggestions
            .into_iter()
            .map(|s| (s, likely_coloring(&s.word, &remaining)))
            .collect::<Vec<_>>()
    })
    .await?;

    for (s, coloring) in likely {
        let line = format!("{}  {:.2} bits", s.word, s.entropy);
        let line = if s.is_valid_answer {
            line.blue().bold().to_string()
        } else {
            line
        };
        match coloring {
            Some(coloring) => println!("{line}  most likely {}", Guess::new(s.word, coloring)),
            None => println!("{line}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_is_bounded() {
        let cli = Cli::try_parse_from(["wordle-advisor", "--top-k", "10", "suggest"]).unwrap();
        assert_eq!(cli.top_k, 10);
        assert_eq!(cli.advisor_config().top_k, 10);

        assert!(Cli::try_parse_from(["wordle-advisor", "--top-k", "0", "suggest"]).is_err());
        assert!(Cli::try_parse_from(["wordle-advisor", "--top-k", "70000", "play"]).is_err());
    }

    #[test]
    fn guesses_parse_from_the_command_line() {
        let cli = Cli::try_parse_from(["wordle-advisor", "suggest", "--guess", "crane:ggxyx"]).unwrap();
        match cli.command {
            Command::Suggest { guesses } => assert_eq!(guesses.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}
