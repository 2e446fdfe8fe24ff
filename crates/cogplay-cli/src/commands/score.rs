//! The `cogplay score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use cogplay_core::games::{self, Outcome, Puzzle, PuzzleEnvelope, Response};
use cogplay_core::history;
use cogplay_core::judge::JudgeRequest;
use cogplay_core::model::{Difficulty, ScoreRecord};

pub async fn execute(
    puzzle_path: PathBuf,
    response_path: PathBuf,
    record_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = cogplay_judge::load_config_from(config_path.as_deref())?;

    let (puzzle, difficulty) = load_puzzle(&puzzle_path, config.default_difficulty)?;
    let response: Response = read_json(&response_path)?;

    let outcome = match (&puzzle, &response) {
        (Puzzle::ThenWhat(p), Response::ThenWhat { response }) => {
            let judge = cogplay_judge::create_judge(&config.judge)?;
            tracing::debug!(judge = judge.name(), "judging then-what response");
            let verdict = judge.judge(&JudgeRequest::new(&p.instruction, response)).await?;
            Outcome::ThenWhat(verdict)
        }
        _ => games::score(&puzzle, &response)?,
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(path) = record_path {
        let record = outcome.to_record(difficulty, Utc::now());
        append_record(&path, record)?;
        eprintln!("Recorded result in {}", path.display());
    }

    Ok(())
}

/// Accept either an envelope from `generate` or a bare puzzle.
fn load_puzzle(path: &Path, default_difficulty: Difficulty) -> Result<(Puzzle, Difficulty)> {
    let value: serde_json::Value = read_json(path)?;
    // a bare sudoku puzzle also has a `puzzle` field, but it is a grid
    if value.get("puzzle").is_some_and(serde_json::Value::is_object) {
        let envelope: PuzzleEnvelope = serde_json::from_value(value)
            .with_context(|| format!("invalid puzzle envelope: {}", path.display()))?;
        Ok((envelope.puzzle, envelope.difficulty))
    } else {
        let puzzle: Puzzle = serde_json::from_value(value)
            .with_context(|| format!("invalid puzzle: {}", path.display()))?;
        Ok((puzzle, default_difficulty))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn append_record(path: &Path, record: ScoreRecord) -> Result<()> {
    let mut records = if path.exists() {
        history::load_history(path)?
    } else {
        Vec::new()
    };
    records.push(record);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&records)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
