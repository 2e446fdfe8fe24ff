//! Sudoku: fill the blanked cells of a 9x9 grid.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::model::Difficulty;

pub const SIZE: usize = 9;
const BOX: usize = 3;

/// A 9x9 grid; `0` marks an empty cell.
pub type Grid = [[u8; SIZE]; SIZE];

/// Tunables for the sudoku game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuConfig {
    pub empty_cells: usize,
}

impl SudokuConfig {
    pub const EASY: SudokuConfig = SudokuConfig { empty_cells: 30 };
    pub const MEDIUM: SudokuConfig = SudokuConfig { empty_cells: 40 };
    pub const HARD: SudokuConfig = SudokuConfig { empty_cells: 50 };

    pub fn for_difficulty(difficulty: Difficulty) -> SudokuConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuPuzzle {
    pub solution: Grid,
    /// The grid shown to the player.
    pub puzzle: Grid,
}

/// The fixed fill every puzzle is carved from.
pub fn base_solution() -> Grid {
    let mut grid = [[0u8; SIZE]; SIZE];
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((r * BOX + r / BOX + c) % SIZE) as u8 + 1;
        }
    }
    grid
}

pub fn generate<R: Rng + ?Sized>(config: &SudokuConfig, rng: &mut R) -> SudokuPuzzle {
    let solution = base_solution();
    let mut puzzle = solution;
    let empty = config.empty_cells.min(SIZE * SIZE);
    for cell in index::sample(rng, SIZE * SIZE, empty) {
        puzzle[cell / SIZE][cell % SIZE] = 0;
    }
    SudokuPuzzle { solution, puzzle }
}

pub fn is_complete(grid: &Grid) -> bool {
    grid.iter().all(|row| row.iter().all(|&v| v != 0))
}

/// Which unit of the grid a duplicate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Row,
    Column,
    Box,
}

/// A digit that appears more than once in a row, column or box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub unit: Unit,
    /// Row, column or box number (boxes numbered left to right, top to bottom).
    pub index: usize,
    pub value: u8,
}

/// List every duplicated digit. Empty cells are ignored.
pub fn violations(grid: &Grid) -> Vec<Violation> {
    let mut found = Vec::new();
    for i in 0..SIZE {
        let row = (0..SIZE).map(|c| grid[i][c]);
        push_duplicates(&mut found, Unit::Row, i, row);

        let col = (0..SIZE).map(|r| grid[r][i]);
        push_duplicates(&mut found, Unit::Column, i, col);

        let (br, bc) = ((i / BOX) * BOX, (i % BOX) * BOX);
        let cells = (0..SIZE).map(|k| grid[br + k / BOX][bc + k % BOX]);
        push_duplicates(&mut found, Unit::Box, i, cells);
    }
    found
}

fn push_duplicates(found: &mut Vec<Violation>, unit: Unit, index: usize, values: impl Iterator<Item = u8>) {
    let mut counts = [0u8; SIZE + 1];
    for v in values {
        if (1..=SIZE as u8).contains(&v) {
            counts[v as usize] += 1;
        }
    }
    for (value, &n) in counts.iter().enumerate().skip(1) {
        if n > 1 {
            found.push(Violation {
                unit,
                index,
                value: value as u8,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuOutcome {
    pub complete: bool,
    pub violations: Vec<Violation>,
    /// Complete and free of duplicates.
    pub solved: bool,
}

pub fn check(grid: &Grid) -> SudokuOutcome {
    let complete = is_complete(grid);
    let violations = violations(grid);
    let solved = complete && violations.is_empty();
    SudokuOutcome {
        complete,
        violations,
        solved,
    }
}

/// Player state for one sudoku play-through. Given cells cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuBoard {
    givens: Grid,
    current: Grid,
}

impl SudokuBoard {
    pub fn new(puzzle: &SudokuPuzzle) -> Self {
        Self {
            givens: puzzle.puzzle,
            current: puzzle.puzzle,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        row < SIZE && col < SIZE && self.givens[row][col] != 0
    }

    /// Enter a digit. Returns `Ok(false)` for a given cell or a digit outside 1..=9.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<bool, GameError> {
        bounds(row, col)?;
        if self.is_given(row, col) || !(1..=SIZE as u8).contains(&value) {
            return Ok(false);
        }
        self.current[row][col] = value;
        Ok(true)
    }

    pub fn clear(&mut self, row: usize, col: usize) -> Result<bool, GameError> {
        bounds(row, col)?;
        if self.is_given(row, col) {
            return Ok(false);
        }
        self.current[row][col] = 0;
        Ok(true)
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.current)
    }

    pub fn check(&self) -> SudokuOutcome {
        check(&self.current)
    }
}

fn bounds(row: usize, col: usize) -> Result<(), GameError> {
    if row >= SIZE || col >= SIZE {
        return Err(GameError::OutOfBounds {
            row,
            col,
            size: SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zeros(grid: &Grid) -> usize {
        grid.iter().flatten().filter(|&&v| v == 0).count()
    }

    #[test]
    fn base_solution_is_a_valid_sudoku() {
        let grid = base_solution();
        assert!(is_complete(&grid));
        assert!(violations(&grid).is_empty());
        assert_eq!(grid[0], [1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(grid[1][0], 4);
    }

    #[test]
    fn generate_blanks_exact_cell_count() {
        let mut rng = StdRng::seed_from_u64(21);
        for difficulty in Difficulty::all() {
            let config = SudokuConfig::for_difficulty(difficulty);
            let puzzle = generate(&config, &mut rng);
            assert_eq!(zeros(&puzzle.puzzle), config.empty_cells);
            assert!(!is_complete(&puzzle.puzzle));
            assert!(is_complete(&puzzle.solution));
        }
    }

    #[test]
    fn board_refuses_given_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        let puzzle = generate(&SudokuConfig::EASY, &mut rng);
        let mut board = SudokuBoard::new(&puzzle);

        let (gr, gc) = (0..81)
            .map(|i| (i / 9, i % 9))
            .find(|&(r, c)| puzzle.puzzle[r][c] != 0)
            .unwrap();
        assert_eq!(board.set(gr, gc, 9), Ok(false));
        assert_eq!(board.clear(gr, gc), Ok(false));
        assert_eq!(board.grid()[gr][gc], puzzle.puzzle[gr][gc]);
    }

    #[test]
    fn board_rejects_out_of_range() {
        let puzzle = SudokuPuzzle {
            solution: base_solution(),
            puzzle: [[0; SIZE]; SIZE],
        };
        let mut board = SudokuBoard::new(&puzzle);
        assert!(matches!(board.set(9, 0, 1), Err(GameError::OutOfBounds { .. })));
        assert_eq!(board.set(0, 0, 0), Ok(false));
        assert_eq!(board.set(0, 0, 10), Ok(false));
    }

    #[test]
    fn filling_from_solution_solves_the_board() {
        let mut rng = StdRng::seed_from_u64(8);
        let puzzle = generate(&SudokuConfig::HARD, &mut rng);
        let mut board = SudokuBoard::new(&puzzle);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if !board.is_given(r, c) {
                    board.set(r, c, puzzle.solution[r][c]).unwrap();
                }
            }
        }
        let outcome = board.check();
        assert!(outcome.complete);
        assert!(outcome.solved);
    }

    #[test]
    fn complete_grid_with_duplicates_is_not_solved() {
        let mut grid = base_solution();
        grid[0][0] = grid[0][1];
        let outcome = check(&grid);
        assert!(outcome.complete);
        assert!(!outcome.solved);
        assert!(outcome
            .violations
            .iter()
            .any(|v| v.unit == Unit::Row && v.index == 0 && v.value == 2));
    }
}
