//! The game families and a kind-tagged front door to them.
//!
//! Each submodule owns one family's config, generator and scorer. The
//! [`Puzzle`], [`Response`] and [`Outcome`] enums let callers that only know
//! a [`GameKind`] at runtime (the CLI, a web handler) generate and score any
//! game through [`generate`] and [`score`].

pub mod identification;
pub mod odd_one_out;
pub mod reaction;
pub mod sequence;
pub mod sudoku;
pub mod then_what;
pub mod word_search;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::model::{Difficulty, GameKind, ScoreRecord};

use identification::{IdentificationConfig, IdentificationPuzzle, SelectionScore};
use odd_one_out::{OddOneOutConfig, OddOneOutPuzzle};
use reaction::{ReactionConfig, ReactionSummary, RecordedClick};
use sequence::{DigitConfig, DigitScore, NameConfig, NameScore, Person};
use sudoku::{Grid, SudokuConfig, SudokuOutcome, SudokuPuzzle};
use then_what::{Judgement, ThenWhatConfig, ThenWhatPuzzle};
use word_search::{Cell, WordSearchConfig, WordSearchPuzzle};

/// A reaction game is fully determined by its seed and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPuzzle {
    pub seed: u64,
    pub config: ReactionConfig,
}

/// A generated puzzle of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Puzzle {
    DigitRecall { digits: String, display_ms: u64 },
    NameRecall { people: Vec<Person>, study_secs: u64 },
    Identification(IdentificationPuzzle),
    OddOneOut(OddOneOutPuzzle),
    Sudoku(SudokuPuzzle),
    WordSearch(WordSearchPuzzle),
    Reaction(ReactionPuzzle),
    ThenWhat(ThenWhatPuzzle),
}

impl Puzzle {
    pub fn kind(&self) -> GameKind {
        match self {
            Puzzle::DigitRecall { .. } => GameKind::DigitRecall,
            Puzzle::NameRecall { .. } => GameKind::NameRecall,
            Puzzle::Identification(_) => GameKind::Identification,
            Puzzle::OddOneOut(_) => GameKind::OddOneOut,
            Puzzle::Sudoku(_) => GameKind::Sudoku,
            Puzzle::WordSearch(_) => GameKind::WordSearch,
            Puzzle::Reaction(_) => GameKind::Reaction,
            Puzzle::ThenWhat(_) => GameKind::ThenWhat,
        }
    }
}

/// A player's answer to a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Response {
    DigitRecall { digits: String },
    NameRecall { people: Vec<Person> },
    Identification { selected: Vec<usize> },
    OddOneOut { selected: usize },
    /// The full grid as the player left it; given cells are taken from the puzzle.
    Sudoku { grid: Grid },
    /// Each submitted selection, in order.
    WordSearch { selections: Vec<Vec<Cell>> },
    Reaction { clicks: Vec<RecordedClick> },
    ThenWhat { response: String },
}

impl Response {
    pub fn kind(&self) -> GameKind {
        match self {
            Response::DigitRecall { .. } => GameKind::DigitRecall,
            Response::NameRecall { .. } => GameKind::NameRecall,
            Response::Identification { .. } => GameKind::Identification,
            Response::OddOneOut { .. } => GameKind::OddOneOut,
            Response::Sudoku { .. } => GameKind::Sudoku,
            Response::WordSearch { .. } => GameKind::WordSearch,
            Response::Reaction { .. } => GameKind::Reaction,
            Response::ThenWhat { .. } => GameKind::ThenWhat,
        }
    }
}

/// The scored result of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Outcome {
    DigitRecall(DigitScore),
    NameRecall(NameScore),
    Identification(SelectionScore),
    OddOneOut { correct: bool },
    Sudoku(SudokuOutcome),
    WordSearch {
        found: Vec<String>,
        total: usize,
        complete: bool,
    },
    Reaction(ReactionSummary),
    ThenWhat(Judgement),
}

impl Outcome {
    pub fn kind(&self) -> GameKind {
        match self {
            Outcome::DigitRecall(_) => GameKind::DigitRecall,
            Outcome::NameRecall(_) => GameKind::NameRecall,
            Outcome::Identification(_) => GameKind::Identification,
            Outcome::OddOneOut { .. } => GameKind::OddOneOut,
            Outcome::Sudoku(_) => GameKind::Sudoku,
            Outcome::WordSearch { .. } => GameKind::WordSearch,
            Outcome::Reaction(_) => GameKind::Reaction,
            Outcome::ThenWhat(_) => GameKind::ThenWhat,
        }
    }

    /// `(score, max_score)` as persisted in the history.
    pub fn points(&self) -> (f64, f64) {
        match self {
            Outcome::DigitRecall(s) => (f64::from(s.percent_correct), 100.0),
            Outcome::NameRecall(s) => (s.correct as f64, s.total as f64),
            Outcome::Identification(s) => (s.score, (s.correct_selected + s.missed) as f64),
            Outcome::OddOneOut { correct } => (if *correct { 1.0 } else { 0.0 }, 1.0),
            Outcome::Sudoku(s) => (if s.solved { 1.0 } else { 0.0 }, 1.0),
            Outcome::WordSearch { found, total, .. } => (found.len() as f64, *total as f64),
            Outcome::Reaction(s) => (f64::from(s.hits), f64::from(s.windows_opened)),
            Outcome::ThenWhat(j) => (f64::from(j.score), 100.0),
        }
    }

    /// A history row for this outcome.
    pub fn to_record(&self, difficulty: Difficulty, created_at: DateTime<Utc>) -> ScoreRecord {
        let kind = self.kind();
        let (score, max_score) = self.points();
        ScoreRecord {
            score,
            max_score,
            level: Some(difficulty.level()),
            category: kind.category().to_string(),
            game_type: kind.to_string(),
            created_at,
        }
    }
}

/// Generate a puzzle of the given kind at the given difficulty.
pub fn generate<R: Rng + ?Sized>(kind: GameKind, difficulty: Difficulty, rng: &mut R) -> Puzzle {
    tracing::debug!(%kind, %difficulty, "generating puzzle");
    match kind {
        GameKind::DigitRecall => {
            let config = DigitConfig::for_difficulty(difficulty);
            Puzzle::DigitRecall {
                digits: sequence::generate_digits(&config, rng),
                display_ms: config.display_ms,
            }
        }
        GameKind::NameRecall => {
            let config = NameConfig::for_difficulty(difficulty);
            Puzzle::NameRecall {
                people: sequence::generate_names(&config, rng),
                study_secs: config.study_secs,
            }
        }
        GameKind::Identification => Puzzle::Identification(identification::generate(
            &IdentificationConfig::for_difficulty(difficulty),
            rng,
        )),
        GameKind::OddOneOut => Puzzle::OddOneOut(odd_one_out::generate(
            &OddOneOutConfig::for_difficulty(difficulty),
            rng,
        )),
        GameKind::Sudoku => Puzzle::Sudoku(sudoku::generate(&SudokuConfig::for_difficulty(difficulty), rng)),
        GameKind::WordSearch => Puzzle::WordSearch(word_search::generate(
            &WordSearchConfig::for_difficulty(difficulty),
            rng,
        )),
        GameKind::Reaction => Puzzle::Reaction(ReactionPuzzle {
            seed: rng.random(),
            config: ReactionConfig::for_difficulty(difficulty),
        }),
        GameKind::ThenWhat => Puzzle::ThenWhat(then_what::generate(
            &ThenWhatConfig::for_difficulty(difficulty),
            rng,
        )),
    }
}

/// Score a response against its puzzle.
///
/// Then-what responses are scored with the keyword heuristic; use an
/// [`IntentJudge`](crate::judge::IntentJudge) for anything better.
pub fn score(puzzle: &Puzzle, response: &Response) -> Result<Outcome, GameError> {
    let outcome = match (puzzle, response) {
        (Puzzle::DigitRecall { digits, .. }, Response::DigitRecall { digits: answer }) => {
            Outcome::DigitRecall(sequence::score_digits(digits, answer))
        }
        (Puzzle::NameRecall { people, .. }, Response::NameRecall { people: answer }) => {
            Outcome::NameRecall(sequence::score_names(people, answer))
        }
        (Puzzle::Identification(p), Response::Identification { selected }) => {
            Outcome::Identification(identification::score(&p.correct_indices, selected))
        }
        (Puzzle::OddOneOut(p), Response::OddOneOut { selected }) => Outcome::OddOneOut {
            correct: odd_one_out::score(p.correct_index, *selected),
        },
        (Puzzle::Sudoku(p), Response::Sudoku { grid }) => Outcome::Sudoku(score_sudoku(p, grid)?),
        (Puzzle::WordSearch(p), Response::WordSearch { selections }) => {
            let found = selections.iter().fold(Vec::new(), |found, cells| {
                word_search::check_selection(cells, &p.grid, &p.words, &found)
            });
            Outcome::WordSearch {
                complete: word_search::is_complete(&p.words, &found),
                total: p.words.len(),
                found,
            }
        }
        (Puzzle::Reaction(p), Response::Reaction { clicks }) => {
            p.config.validate()?;
            Outcome::Reaction(reaction::replay(p.config, p.seed, clicks))
        }
        (Puzzle::ThenWhat(p), Response::ThenWhat { response }) => {
            Outcome::ThenWhat(then_what::heuristic_judge(&p.instruction, response))
        }
        (puzzle, response) => {
            return Err(GameError::Mismatch {
                puzzle: puzzle.kind(),
                response: response.kind(),
            })
        }
    };
    Ok(outcome)
}

/// Overlay the player's grid on the givens. Given cells keep their digit.
fn score_sudoku(puzzle: &SudokuPuzzle, answer: &Grid) -> Result<SudokuOutcome, GameError> {
    let mut board = sudoku::SudokuBoard::new(puzzle);
    for (r, row) in answer.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            if board.is_given(r, c) {
                continue;
            }
            if !board.set(r, c, value)? {
                tracing::debug!(row = r, col = c, value, "ignoring out-of-range sudoku digit");
            }
        }
    }
    Ok(board.check())
}

/// A generated puzzle with the metadata a client needs to store or replay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleEnvelope {
    pub id: Uuid,
    pub game: GameKind,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    pub puzzle: Puzzle,
}

impl PuzzleEnvelope {
    pub fn new(puzzle: Puzzle, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            game: puzzle.kind(),
            difficulty,
            created_at: Utc::now(),
            puzzle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generate_matches_requested_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        for kind in GameKind::all() {
            for difficulty in Difficulty::all() {
                assert_eq!(generate(kind, difficulty, &mut rng).kind(), kind);
            }
        }
    }

    #[test]
    fn mismatched_response_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = generate(GameKind::Sudoku, Difficulty::Easy, &mut rng);
        let err = score(&puzzle, &Response::OddOneOut { selected: 0 }).unwrap_err();
        assert_eq!(
            err,
            GameError::Mismatch {
                puzzle: GameKind::Sudoku,
                response: GameKind::OddOneOut,
            }
        );
        assert_eq!(err.to_string(), "response for odd-one-out cannot score a sudoku puzzle");
    }

    #[test]
    fn digit_recall_through_dispatcher() {
        let puzzle = Puzzle::DigitRecall {
            digits: "482913".into(),
            display_ms: 4000,
        };
        let outcome = score(
            &puzzle,
            &Response::DigitRecall {
                digits: "482000".into(),
            },
        )
        .unwrap();
        assert_eq!(outcome.points(), (50.0, 100.0));
    }

    #[test]
    fn sudoku_answer_cannot_overwrite_givens() {
        let mut rng = StdRng::seed_from_u64(11);
        let Puzzle::Sudoku(p) = generate(GameKind::Sudoku, Difficulty::Medium, &mut rng) else {
            panic!("expected sudoku");
        };
        let puzzle = Puzzle::Sudoku(p.clone());

        let solved = score(&puzzle, &Response::Sudoku { grid: p.solution }).unwrap();
        assert!(matches!(solved, Outcome::Sudoku(ref o) if o.solved));

        // tampering with a given cell is ignored
        let mut tampered = p.solution;
        let (r, c) = (0..81)
            .map(|i| (i / 9, i % 9))
            .find(|&(r, c)| p.puzzle[r][c] != 0)
            .unwrap();
        tampered[r][c] = tampered[r][c] % 9 + 1;
        let outcome = score(&puzzle, &Response::Sudoku { grid: tampered }).unwrap();
        assert!(matches!(outcome, Outcome::Sudoku(ref o) if o.solved));

        let empty = score(&puzzle, &Response::Sudoku { grid: p.puzzle }).unwrap();
        assert_eq!(empty.points(), (0.0, 1.0));

        // a digit outside 1..=9 leaves the blank cell empty
        let mut garbled = p.solution;
        let (r, c) = (0..81)
            .map(|i| (i / 9, i % 9))
            .find(|&(r, c)| p.puzzle[r][c] == 0)
            .unwrap();
        garbled[r][c] = 12;
        let outcome = score(&puzzle, &Response::Sudoku { grid: garbled }).unwrap();
        assert!(matches!(outcome, Outcome::Sudoku(ref o) if !o.complete && !o.solved));
    }

    #[test]
    fn reaction_with_out_of_range_settings_is_an_error() {
        let puzzle = Puzzle::Reaction(ReactionPuzzle {
            seed: 1,
            config: ReactionConfig {
                reaction_time_ms: u64::MAX,
                duration_ms: 60_000,
            },
        });
        let clicks = vec![RecordedClick {
            at_ms: 10,
            color: reaction::Color::Red,
        }];
        let err = score(&puzzle, &Response::Reaction { clicks: clicks.clone() }).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig { game: GameKind::Reaction, .. }));

        let endless = Puzzle::Reaction(ReactionPuzzle {
            seed: 1,
            config: ReactionConfig {
                reaction_time_ms: 1,
                duration_ms: u64::MAX,
            },
        });
        assert!(score(&endless, &Response::Reaction { clicks }).is_err());
    }

    #[test]
    fn word_search_selections_accumulate() {
        let mut rng = StdRng::seed_from_u64(5);
        let Puzzle::WordSearch(p) = generate(GameKind::WordSearch, Difficulty::Easy, &mut rng) else {
            panic!("expected word search");
        };
        let mut selections: Vec<Vec<Cell>> = p.placements.iter().map(|pl| pl.cells()).collect();
        selections.push(selections[0].clone());
        let outcome = score(&Puzzle::WordSearch(p.clone()), &Response::WordSearch { selections }).unwrap();
        match outcome {
            Outcome::WordSearch { found, total, complete } => {
                assert_eq!(found.len(), p.words.len());
                assert_eq!(total, p.words.len());
                assert!(complete);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn reaction_with_no_clicks_scores_zero() {
        let puzzle = Puzzle::Reaction(ReactionPuzzle {
            seed: 9,
            config: ReactionConfig::EASY,
        });
        let outcome = score(&puzzle, &Response::Reaction { clicks: vec![] }).unwrap();
        let (hits, windows) = outcome.points();
        assert_eq!(hits, 0.0);
        assert!(windows > 0.0);
    }

    #[test]
    fn outcome_becomes_history_record() {
        let outcome = Outcome::OddOneOut { correct: true };
        let record = outcome.to_record(Difficulty::Hard, Utc::now());
        assert_eq!(record.game_type, "odd-one-out");
        assert_eq!(record.category, "language");
        assert_eq!(record.level, Some(3));
        assert_eq!(record.percentage(), Some(100.0));
    }

    #[test]
    fn puzzle_json_is_tagged_by_game() {
        let puzzle = Puzzle::ThenWhat(ThenWhatPuzzle {
            instruction: "Type the number 47.".into(),
        });
        let json = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(json["game"], "then-what");
        assert_eq!(json["instruction"], "Type the number 47.");

        let response: Response =
            serde_json::from_str(r#"{"game": "odd-one-out", "selected": 2}"#).unwrap();
        assert_eq!(response, Response::OddOneOut { selected: 2 });
    }

    #[test]
    fn envelope_records_kind_and_difficulty() {
        let mut rng = StdRng::seed_from_u64(1);
        let envelope = PuzzleEnvelope::new(
            generate(GameKind::NameRecall, Difficulty::Hard, &mut rng),
            Difficulty::Hard,
        );
        assert_eq!(envelope.game, GameKind::NameRecall);
        let json = serde_json::to_string(&envelope).unwrap();
        let back: PuzzleEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, envelope.id);
        assert_eq!(back.puzzle, envelope.puzzle);
    }
}
