//! The `cogplay generate` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cogplay_core::games::{self, Puzzle, PuzzleEnvelope};
use cogplay_core::model::{Difficulty, GameKind};

pub fn execute(
    game: String,
    difficulty: Option<String>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = cogplay_judge::load_config_from(config_path.as_deref())?;

    let kind: GameKind = game.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let difficulty: Difficulty = match difficulty {
        Some(d) => d.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
        None => config.default_difficulty,
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };

    let mut puzzle = games::generate(kind, difficulty, &mut rng);
    if let Puzzle::Reaction(reaction) = &mut puzzle {
        reaction.config.duration_ms = config.reaction_duration_secs.saturating_mul(1000);
        reaction.config.validate()?;
    }

    let envelope = PuzzleEnvelope::new(puzzle, difficulty);
    tracing::info!(id = %envelope.id, game = %kind, %difficulty, "generated puzzle");
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
