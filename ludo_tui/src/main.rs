use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use ludo::{ScriptedDice, TurnScheduler};
use ludo_match::{MatchConfig, MatchOrchestrator, MatchResult, MatchState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod terminal;
mod widgets;

use terminal::{restore_terminal, setup_terminal, TerminalFrontend};

#[derive(Parser)]
struct Args {
    /// Path to a match config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pieces per player, between 1 and 4
    #[arg(short, long)]
    pieces: Option<u8>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Roll these values in a loop instead of random ones, e.g. "6,4,1"
    #[arg(long, value_delimiter = ',')]
    dice: Vec<u8>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Write logs to this file. Nothing is logged without one, since the
    /// terminal is taken by the board.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        initialize_logging(args.log_level, File::create(path)?);
    }

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(pieces) = args.pieces {
        config.piece_count = pieces;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let state = if args.dice.is_empty() {
        MatchState::from_config(&config)?
    } else {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, dice = ?args.dice, "New match with scripted dice");
        let dice = ScriptedDice::new(args.dice.clone())?;
        let scheduler = TurnScheduler::new(StdRng::seed_from_u64(seed));
        MatchState::new(config.piece_count, Box::new(dice), scheduler)?
    };
    let orchestrator = MatchOrchestrator::new(state, config);

    let mut frontend = TerminalFrontend::new(setup_terminal()?);
    let result = orchestrator.run(&mut frontend).and_then(|result| {
        if !result.aborted {
            frontend.show_result(&orchestrator.state().snapshot(), &result)?;
        }
        Ok(result)
    });
    restore_terminal()?;

    print_result(&result?);
    Ok(())
}

fn print_result(result: &MatchResult) {
    if result.aborted {
        println!("Match aborted.");
    }
    for (place, player) in result.winners.iter().enumerate() {
        println!(
            "{}. {} ({} points)",
            place + 1,
            player,
            result.scores[player.index()]
        );
    }
}

fn initialize_logging(level: LevelFilter, file: File) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
}
