//! Command-line entry point: plays against a human by default, or against a
//! match runner with `--mode harness`.

use std::io;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use oxo::search::{Config, Mcts};
use oxo::Engine;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    /// Which protocol to speak on stdin/stdout.
    #[arg(long, value_enum, default_value_t = Mode::Interactive)]
    mode: Mode,
    /// Weight of the exploration term in UCT [default: 0.8].
    #[arg(long)]
    exploration: Option<f64>,
    /// Search time per move in milliseconds [default: 90].
    #[arg(long)]
    budget_ms: Option<u64>,
    /// Extra search time for the first move of a game in milliseconds
    /// [default: 900].
    #[arg(long)]
    first_move_bonus_ms: Option<u64>,
    /// Seed for reproducible games. Seeded from the OS if absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter for stderr, overridden by `RUST_LOG`.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Searches a fixed set of positions and reports nodes per second.
    Bench,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Prompts, diagnostics and board printing for a human player.
    Interactive,
    /// One move per line in, one move per line out.
    Harness,
}

impl Args {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            exploration: self.exploration.unwrap_or(defaults.exploration),
            budget: self
                .budget_ms
                .map_or(defaults.budget, Duration::from_millis),
            first_move_bonus: self
                .first_move_bonus_ms
                .map_or(defaults.first_move_bonus, Duration::from_millis),
            seed: self.seed,
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut stdout = io::stdout().lock();
    if let Some(Command::Bench) = args.command {
        return oxo::engine::bench(&mut stdout);
    }

    let config = args.config();
    tracing::debug!(?config, mode = ?args.mode, "starting");
    let mcts = Mcts::new(config);
    match args.mode {
        Mode::Interactive => {
            oxo::print_engine_info(&mut stdout)?;
            Engine::new(mcts, io::stdin().lock(), stdout).interactive_loop()
        },
        Mode::Harness => Engine::new(mcts, io::stdin().lock(), stdout).harness_loop(),
    }
}
