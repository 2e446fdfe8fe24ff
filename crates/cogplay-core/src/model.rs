//! Core data model types for cogplay.
//!
//! Difficulty tiers, the catalogue of games, and the persisted score
//! record that the progress statistics are computed from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tier chosen by the player before a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// Numeric level stored alongside each score (1, 2 or 3).
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Difficulty> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The mini-games offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    DigitRecall,
    NameRecall,
    Identification,
    OddOneOut,
    Sudoku,
    WordSearch,
    Reaction,
    ThenWhat,
}

impl GameKind {
    pub fn all() -> [GameKind; 8] {
        [
            GameKind::DigitRecall,
            GameKind::NameRecall,
            GameKind::Identification,
            GameKind::OddOneOut,
            GameKind::Sudoku,
            GameKind::WordSearch,
            GameKind::Reaction,
            GameKind::ThenWhat,
        ]
    }

    /// Symptom category the game exercises, as shown on the tracker.
    pub fn category(self) -> &'static str {
        match self {
            GameKind::DigitRecall | GameKind::NameRecall | GameKind::ThenWhat => "memory",
            GameKind::Identification | GameKind::Reaction => "attention",
            GameKind::OddOneOut | GameKind::WordSearch => "language",
            GameKind::Sudoku => "problem-solving",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::DigitRecall => "digit-recall",
            GameKind::NameRecall => "name-recall",
            GameKind::Identification => "identification",
            GameKind::OddOneOut => "odd-one-out",
            GameKind::Sudoku => "sudoku",
            GameKind::WordSearch => "word-search",
            GameKind::Reaction => "reaction",
            GameKind::ThenWhat => "then-what",
        };
        f.write_str(name)
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "digit-recall" | "digits" => Ok(GameKind::DigitRecall),
            "name-recall" | "names" => Ok(GameKind::NameRecall),
            "identification" => Ok(GameKind::Identification),
            "odd-one-out" | "word-finder" => Ok(GameKind::OddOneOut),
            "sudoku" => Ok(GameKind::Sudoku),
            "word-search" => Ok(GameKind::WordSearch),
            "reaction" | "rgb" => Ok(GameKind::Reaction),
            "then-what" => Ok(GameKind::ThenWhat),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// One persisted game result, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: f64,
    pub max_score: f64,
    /// Difficulty level the game was played at (1 = easy .. 3 = hard).
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub category: String,
    pub game_type: String,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Percentage of the maximum score, or `None` when the maximum is not positive.
    pub fn percentage(&self) -> Option<f64> {
        (self.max_score > 0.0).then(|| self.score / self.max_score * 100.0)
    }
}
