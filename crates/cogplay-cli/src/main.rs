//! cogplay CLI: generate, score and track cognitive mini-games.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cogplay",
    version,
    about = "Cognitive mini-game puzzles, scoring and progress trends"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a puzzle as JSON
    Generate {
        /// Game to generate (e.g. digit-recall, sudoku, then-what)
        #[arg(long)]
        game: String,

        /// easy, medium or hard (defaults to the configured difficulty)
        #[arg(long)]
        difficulty: Option<String>,

        /// Seed for a reproducible puzzle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score a response against a generated puzzle
    Score {
        /// Puzzle JSON, as written by `generate`
        #[arg(long)]
        puzzle: PathBuf,

        /// Response JSON
        #[arg(long)]
        response: PathBuf,

        /// Append the result to this history file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Judge a then-what response with the configured judge
    Judge {
        /// The instruction that was shown
        #[arg(long, requires = "response", conflicts_with = "batch")]
        instruction: Option<String>,

        /// What the player remembered
        #[arg(long)]
        response: Option<String>,

        /// JSON array of {"instruction", "response"} pairs
        #[arg(long)]
        batch: Option<PathBuf>,
    },

    /// Show weekly or monthly progress from score history
    Trend {
        /// History JSON file or directory (defaults to the configured history dir)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Window unit: week or month
        #[arg(long, default_value = "week")]
        unit: String,

        /// Only the last N windows up to today
        #[arg(long)]
        windows: Option<usize>,

        /// Only this game
        #[arg(long)]
        game: Option<String>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check score history for suspicious records
    Validate {
        /// History JSON file or directory
        #[arg(long)]
        history: PathBuf,
    },

    /// Create starter config and example history
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cogplay=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Generate {
            game,
            difficulty,
            seed,
        } => commands::generate::execute(game, difficulty, seed, config),
        Commands::Score {
            puzzle,
            response,
            record,
        } => commands::score::execute(puzzle, response, record, config).await,
        Commands::Judge {
            instruction,
            response,
            batch,
        } => commands::judge::execute(instruction, response, batch, config).await,
        Commands::Trend {
            history,
            unit,
            windows,
            game,
            format,
        } => commands::trend::execute(history, unit, windows, game, format, config),
        Commands::Validate { history } => commands::validate::execute(history),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
