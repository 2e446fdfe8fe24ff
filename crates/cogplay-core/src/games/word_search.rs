//! Word search: find the target words hidden in a letter grid.
//!
//! Targets are laid along straight lines (right, down or diagonally down
//! and to either side) before the remaining cells are filled with random
//! letters, so every listed word can be traced in the grid.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const PLACEMENT_ATTEMPTS: usize = 100;

const WORDS: &[&str] = &[
    "MEMORY", "FOCUS", "BRAIN", "THINK", "LEARN", "RECALL", "SMILE", "CALM", "HOPE", "PEACE",
    "GARDEN", "MUSIC", "SUNNY", "RIVER", "APPLE", "BREAD", "CHAIR", "CLOCK", "HOUSE", "PLANT",
    "TRAIN", "WATER", "LIGHT", "HEART", "DREAM", "SPARK", "OCEAN", "CLOUD", "BEACH", "STONE",
];

/// Tunables for the word search game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    pub words_count: usize,
}

impl WordSearchConfig {
    pub const EASY: WordSearchConfig = WordSearchConfig {
        grid_size: 8,
        words_count: 4,
    };
    pub const MEDIUM: WordSearchConfig = WordSearchConfig {
        grid_size: 10,
        words_count: 6,
    };
    pub const HARD: WordSearchConfig = WordSearchConfig {
        grid_size: 12,
        words_count: 8,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> WordSearchConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

/// A `(row, col)` position in the grid.
pub type Cell = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Down,
    DownRight,
    DownLeft,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    fn step(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::DownLeft => (1, -1),
        }
    }
}

/// Where a target word was laid in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub word: String,
    pub start: Cell,
    pub direction: Direction,
}

impl Placement {
    /// The cells spelling the word, in reading order.
    pub fn cells(&self) -> Vec<Cell> {
        line(self.start, self.direction, self.word.len()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchPuzzle {
    pub grid: Vec<Vec<char>>,
    pub words: Vec<String>,
    pub placements: Vec<Placement>,
}

fn line(start: Cell, direction: Direction, len: usize) -> Option<Vec<Cell>> {
    let (dr, dc) = direction.step();
    (0..len as isize)
        .map(|i| {
            let r = start.0 as isize + dr * i;
            let c = start.1 as isize + dc * i;
            (r >= 0 && c >= 0).then_some((r as usize, c as usize))
        })
        .collect()
}

pub fn generate<R: Rng + ?Sized>(config: &WordSearchConfig, rng: &mut R) -> WordSearchPuzzle {
    let size = config.grid_size;
    let mut grid: Vec<Vec<Option<char>>> = vec![vec![None; size]; size];

    let mut candidates: Vec<&str> = WORDS.iter().copied().filter(|w| w.len() <= size).collect();
    candidates.shuffle(rng);

    let mut placements = Vec::new();
    for word in candidates {
        if placements.len() == config.words_count {
            break;
        }
        match place_word(&mut grid, word, rng) {
            Some(placement) => placements.push(placement),
            None => tracing::debug!(word, size, "could not place word, trying another"),
        }
    }

    let grid = grid
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.unwrap_or_else(|| random_letter(rng)))
                .collect()
        })
        .collect();

    WordSearchPuzzle {
        grid,
        words: placements.iter().map(|p| p.word.clone()).collect(),
        placements,
    }
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(ALPHABET[rng.random_range(0..ALPHABET.len())])
}

fn place_word<R: Rng + ?Sized>(grid: &mut [Vec<Option<char>>], word: &str, rng: &mut R) -> Option<Placement> {
    let size = grid.len();
    if size == 0 || word.len() > size {
        return None;
    }
    let letters: Vec<char> = word.chars().collect();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        let start = (rng.random_range(0..size), rng.random_range(0..size));
        let Some(cells) = line(start, direction, letters.len()) else {
            continue;
        };
        let fits = cells.iter().zip(&letters).all(|(&(r, c), &ch)| {
            r < size && c < size && grid[r][c].map_or(true, |existing| existing == ch)
        });
        if !fits {
            continue;
        }
        for (&(r, c), &ch) in cells.iter().zip(&letters) {
            grid[r][c] = Some(ch);
        }
        return Some(Placement {
            word: word.to_string(),
            start,
            direction,
        });
    }
    None
}

/// Check a submitted selection against the target words.
///
/// The letters under `cells`, in selection order, form the candidate. A
/// selection of fewer than two cells, or one that leaves the grid, changes
/// nothing. Returns the found list, extended when the candidate is a target
/// that had not been found yet.
pub fn check_selection(cells: &[Cell], grid: &[Vec<char>], words: &[String], found: &[String]) -> Vec<String> {
    let mut updated = found.to_vec();
    if cells.len() < 2 {
        return updated;
    }

    let candidate: Option<String> = cells
        .iter()
        .map(|&(r, c)| grid.get(r).and_then(|row| row.get(c)).copied())
        .collect();
    let Some(candidate) = candidate else {
        return updated;
    };

    if words.contains(&candidate) && !found.contains(&candidate) {
        updated.push(candidate);
    }
    updated
}

pub fn is_complete(words: &[String], found: &[String]) -> bool {
    found.len() == words.len()
}

/// Player state for one word search play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchBoard {
    puzzle: WordSearchPuzzle,
    selection: Vec<Cell>,
    found: Vec<String>,
}

impl WordSearchBoard {
    pub fn new(puzzle: WordSearchPuzzle) -> Self {
        Self {
            puzzle,
            selection: Vec::new(),
            found: Vec::new(),
        }
    }

    pub fn puzzle(&self) -> &WordSearchPuzzle {
        &self.puzzle
    }

    pub fn selection(&self) -> &[Cell] {
        &self.selection
    }

    pub fn found(&self) -> &[String] {
        &self.found
    }

    /// Add a cell to the end of the selection, or remove it if already selected.
    pub fn toggle(&mut self, cell: Cell) {
        if let Some(pos) = self.selection.iter().position(|&c| c == cell) {
            self.selection.remove(pos);
        } else {
            self.selection.push(cell);
        }
    }

    /// Check the current selection. Returns the newly found word, if any.
    /// A selection of fewer than two cells is kept for further toggling.
    pub fn submit(&mut self) -> Option<String> {
        if self.selection.len() < 2 {
            return None;
        }
        let before = self.found.len();
        self.found = check_selection(&self.selection, &self.puzzle.grid, &self.puzzle.words, &self.found);
        self.selection.clear();
        (self.found.len() > before).then(|| self.found[before].clone())
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.puzzle.words, &self.found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_grid() -> Vec<Vec<char>> {
        vec![
            "CATX".chars().collect(),
            "ODOG".chars().collect(),
            "WXYZ".chars().collect(),
        ]
    }

    fn targets() -> Vec<String> {
        vec!["CAT".into(), "DOG".into(), "COW".into()]
    }

    #[test]
    fn generated_words_are_traceable() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            for difficulty in Difficulty::all() {
                let config = WordSearchConfig::for_difficulty(difficulty);
                let puzzle = generate(&config, &mut rng);
                assert_eq!(puzzle.grid.len(), config.grid_size);
                assert!(puzzle.grid.iter().all(|row| row.len() == config.grid_size));
                assert_eq!(puzzle.words.len(), config.words_count);

                for placement in &puzzle.placements {
                    let cells = placement.cells();
                    let found = check_selection(&cells, &puzzle.grid, &puzzle.words, &[]);
                    assert_eq!(found, vec![placement.word.clone()]);
                }
            }
        }
    }

    #[test]
    fn selection_spelling_a_target_is_found() {
        let found = check_selection(&[(0, 0), (0, 1), (0, 2)], &small_grid(), &targets(), &[]);
        assert_eq!(found, vec!["CAT".to_string()]);
    }

    #[test]
    fn selection_order_matters() {
        let found = check_selection(&[(0, 2), (0, 1), (0, 0)], &small_grid(), &targets(), &[]);
        assert!(found.is_empty());
    }

    #[test]
    fn non_target_leaves_found_unchanged() {
        let already = vec!["DOG".to_string()];
        let found = check_selection(&[(2, 1), (2, 2)], &small_grid(), &targets(), &already);
        assert_eq!(found, already);
    }

    #[test]
    fn already_found_word_is_not_added_twice() {
        let already = vec!["CAT".to_string()];
        let found = check_selection(&[(0, 0), (0, 1), (0, 2)], &small_grid(), &targets(), &already);
        assert_eq!(found, already);
    }

    #[test]
    fn short_or_out_of_grid_selection_is_a_no_op() {
        assert!(check_selection(&[(0, 0)], &small_grid(), &targets(), &[]).is_empty());
        assert!(check_selection(&[(0, 0), (9, 9)], &small_grid(), &targets(), &[]).is_empty());
    }

    #[test]
    fn board_toggle_and_submit() {
        let puzzle = WordSearchPuzzle {
            grid: small_grid(),
            words: targets(),
            placements: vec![],
        };
        let mut board = WordSearchBoard::new(puzzle);

        board.toggle((0, 0));
        assert_eq!(board.submit(), None);
        assert_eq!(board.selection(), &[(0, 0)]);

        board.toggle((1, 1));
        board.toggle((1, 1));
        board.toggle((1, 0));
        board.toggle((2, 0));
        assert_eq!(board.submit(), Some("COW".to_string()));
        assert!(board.selection().is_empty());

        for cell in [(1, 1), (1, 2), (1, 3)] {
            board.toggle(cell);
        }
        assert_eq!(board.submit(), Some("DOG".to_string()));
        assert!(!board.is_complete());

        for cell in [(0, 0), (0, 1), (0, 2)] {
            board.toggle(cell);
        }
        board.submit();
        assert!(board.is_complete());
    }
}
