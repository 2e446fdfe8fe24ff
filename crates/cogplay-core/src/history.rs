//! Score history loading.
//!
//! History files are JSON arrays of [`ScoreRecord`]s, as exported from the
//! backend. A directory of such files can be loaded at once.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::model::{GameKind, ScoreRecord};

/// Load a single JSON history file.
pub fn load_history(path: &Path) -> Result<Vec<ScoreRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file: {}", path.display()))?;

    parse_history_str(&content, path)
}

/// Parse a JSON history string (useful for testing).
pub fn parse_history_str(content: &str, source_path: &Path) -> Result<Vec<ScoreRecord>> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse history JSON: {}", source_path.display()))
}

/// Recursively load all `.json` history files from a directory, oldest record first.
pub fn load_history_directory(dir: &Path) -> Result<Vec<ScoreRecord>> {
    let mut records = collect_directory(dir)?;
    records.sort_by_key(|r| r.created_at);
    Ok(records)
}

fn collect_directory(dir: &Path) -> Result<Vec<ScoreRecord>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();

        if path.is_dir() {
            records.extend(collect_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load_history(&path) {
                Ok(loaded) => records.extend(loaded),
                Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
            }
        }
    }
    Ok(records)
}

/// Load a file or a directory of files.
pub fn load_history_path(path: &Path) -> Result<Vec<ScoreRecord>> {
    if path.is_dir() {
        load_history_directory(path)
    } else {
        load_history(path)
    }
}

/// A problem found in a history record.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWarning {
    /// Position of the record in the input.
    pub index: usize,
    pub message: String,
}

/// Check records for values the statistics will ignore or misreport.
pub fn validate_history(records: &[ScoreRecord], now: DateTime<Utc>) -> Vec<HistoryWarning> {
    let mut warnings = Vec::new();
    let mut warn = |index: usize, message: String| warnings.push(HistoryWarning { index, message });

    for (index, record) in records.iter().enumerate() {
        if record.max_score <= 0.0 {
            warn(
                index,
                format!("max_score is {}; excluded from percentages", record.max_score),
            );
        } else if record.score > record.max_score {
            warn(
                index,
                format!("score {} exceeds max_score {}", record.score, record.max_score),
            );
        }

        if let Some(level) = record.level.filter(|l| !(1..=3).contains(l)) {
            warn(index, format!("level {level} is outside 1..=3"));
        }

        if record.game_type.parse::<GameKind>().is_err() {
            warn(index, format!("unknown game type: {}", record.game_type));
        }

        if record.created_at > now {
            warn(index, format!("created_at {} is in the future", record.created_at));
        }
    }

    warnings
}
