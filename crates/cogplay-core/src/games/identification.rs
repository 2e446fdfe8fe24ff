//! Identification: select every option that fits the instruction.
//!
//! Scoring gives partial credit: +1 for each correct option selected and
//! -0.5 for each wrong one, floored at zero per puzzle.

use std::collections::BTreeSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

const CORRECT_POINTS: f64 = 1.0;
const INCORRECT_PENALTY: f64 = 0.5;

/// Tunables for the identification game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationConfig {
    pub num_correct: usize,
    pub num_options: usize,
    pub rounds: usize,
}

impl IdentificationConfig {
    pub const EASY: IdentificationConfig = IdentificationConfig {
        num_correct: 3,
        num_options: 8,
        rounds: 5,
    };
    pub const MEDIUM: IdentificationConfig = IdentificationConfig {
        num_correct: 4,
        num_options: 8,
        rounds: 5,
    };
    pub const HARD: IdentificationConfig = IdentificationConfig {
        num_correct: 5,
        num_options: 8,
        rounds: 5,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> IdentificationConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

struct Template {
    instruction: &'static str,
    positives: &'static [&'static str],
    negatives: &'static [&'static str],
}

const TEMPLATES: &[Template] = &[
    Template {
        instruction: "Select all the fruits",
        positives: &[
            "Apple", "Banana", "Cherry", "Grape", "Mango", "Orange", "Pear", "Peach", "Plum",
        ],
        negatives: &[
            "Carrot", "Potato", "Onion", "Lettuce", "Broccoli", "Celery", "Spinach", "Pepper",
        ],
    },
    Template {
        instruction: "Select all the animals",
        positives: &[
            "Dog", "Cat", "Horse", "Rabbit", "Tiger", "Elephant", "Giraffe", "Zebra", "Lion",
        ],
        negatives: &[
            "Table", "Chair", "Lamp", "Window", "Pencil", "Bottle", "Clock", "Mirror",
        ],
    },
    Template {
        instruction: "Select all the things you can wear",
        positives: &[
            "Shirt", "Hat", "Scarf", "Gloves", "Jacket", "Socks", "Boots", "Belt", "Sweater",
        ],
        negatives: &[
            "Spoon", "Kettle", "Hammer", "Bucket", "Ladder", "Stapler", "Candle", "Plate",
        ],
    },
    Template {
        instruction: "Select all the colours",
        positives: &[
            "Red", "Blue", "Green", "Yellow", "Purple", "Orange", "Pink", "Brown", "Black",
        ],
        negatives: &[
            "Circle", "Square", "Triangle", "Monday", "River", "Cloud", "Paper", "Music",
        ],
    },
    Template {
        instruction: "Select all the things found in a kitchen",
        positives: &[
            "Oven", "Fridge", "Toaster", "Sink", "Kettle", "Frying pan", "Spatula", "Blender",
            "Microwave",
        ],
        negatives: &[
            "Lawnmower", "Pillow", "Shower", "Bicycle", "Wardrobe", "Rake", "Bathtub", "Tent",
        ],
    },
];

/// One identification puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationPuzzle {
    pub instruction: String,
    pub options: Vec<String>,
    /// Indices into `options` that fit the instruction, ascending.
    pub correct_indices: Vec<usize>,
}

/// Per-criterion breakdown of a scored selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionScore {
    pub correct_selected: usize,
    pub incorrect_selected: usize,
    pub missed: usize,
    pub score: f64,
}

pub fn generate<R: Rng + ?Sized>(config: &IdentificationConfig, rng: &mut R) -> IdentificationPuzzle {
    // TEMPLATES is a non-empty constant.
    let template = TEMPLATES.choose(rng).unwrap_or(&TEMPLATES[0]);

    let num_correct = config.num_correct.min(template.positives.len()).min(config.num_options);
    let num_incorrect = (config.num_options - num_correct).min(template.negatives.len());

    let mut options: Vec<(String, bool)> = template
        .positives
        .choose_multiple(rng, num_correct)
        .map(|s| (s.to_string(), true))
        .chain(
            template
                .negatives
                .choose_multiple(rng, num_incorrect)
                .map(|s| (s.to_string(), false)),
        )
        .collect();
    options.shuffle(rng);

    let correct_indices = options
        .iter()
        .enumerate()
        .filter_map(|(i, (_, correct))| correct.then_some(i))
        .collect();

    tracing::debug!(instruction = template.instruction, num_correct, "generated identification puzzle");

    IdentificationPuzzle {
        instruction: template.instruction.to_string(),
        options: options.into_iter().map(|(label, _)| label).collect(),
        correct_indices,
    }
}

/// Score one puzzle. Duplicate selections count once; the result is never negative.
pub fn score(correct_indices: &[usize], selected_indices: &[usize]) -> SelectionScore {
    let correct: BTreeSet<usize> = correct_indices.iter().copied().collect();
    let selected: BTreeSet<usize> = selected_indices.iter().copied().collect();

    let correct_selected = selected.intersection(&correct).count();
    let incorrect_selected = selected.difference(&correct).count();
    let missed = correct.len() - correct_selected;

    let raw = correct_selected as f64 * CORRECT_POINTS - incorrect_selected as f64 * INCORRECT_PENALTY;

    SelectionScore {
        correct_selected,
        incorrect_selected,
        missed,
        score: raw.max(0.0),
    }
}

/// The options a player has ticked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick an option, or untick it if it was already ticked. Returns whether it is now ticked.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

/// Running total across the rounds of one game; each puzzle is floored on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTally {
    pub total: f64,
    pub rounds_played: usize,
    pub max_possible: f64,
}

impl SessionTally {
    pub fn record(&mut self, puzzle: &IdentificationPuzzle, result: &SelectionScore) {
        self.total += result.score;
        self.rounds_played += 1;
        self.max_possible += puzzle.correct_indices.len() as f64 * CORRECT_POINTS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generate_respects_difficulty() {
        let mut rng = StdRng::seed_from_u64(11);
        for difficulty in Difficulty::all() {
            let config = IdentificationConfig::for_difficulty(difficulty);
            let puzzle = generate(&config, &mut rng);
            assert_eq!(puzzle.options.len(), 8);
            assert_eq!(puzzle.correct_indices.len(), config.num_correct);
        }
    }

    #[test]
    fn correct_indices_point_at_positive_options() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let puzzle = generate(&IdentificationConfig::MEDIUM, &mut rng);
            let template = TEMPLATES
                .iter()
                .find(|t| t.instruction == puzzle.instruction)
                .unwrap();
            for (i, option) in puzzle.options.iter().enumerate() {
                let positive = template.positives.contains(&option.as_str());
                assert_eq!(positive, puzzle.correct_indices.contains(&i), "{option}");
            }
        }
    }

    #[test]
    fn selecting_only_correct_options() {
        let result = score(&[0, 2, 5], &[0, 2]);
        assert_eq!(result.score, 2.0);
        assert_eq!(result.missed, 1);
    }

    #[test]
    fn wrong_selection_costs_half_a_point() {
        let result = score(&[0, 2, 5], &[0, 2, 3]);
        assert_eq!(result.score, 1.5);
        assert_eq!(result.incorrect_selected, 1);
    }

    #[test]
    fn score_never_negative() {
        let result = score(&[0, 2, 5], &[1, 3, 4, 6, 7]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn score_is_monotonic() {
        let correct = [0, 2, 5];
        let mut previous = -1.0;
        for selected in [vec![], vec![0], vec![0, 2], vec![0, 2, 5]] {
            let s = score(&correct, &selected).score;
            assert!(s >= previous);
            previous = s;
        }

        let mut previous = f64::MAX;
        for selected in [vec![0, 2], vec![0, 2, 1], vec![0, 2, 1, 3], vec![0, 2, 1, 3, 4]] {
            let s = score(&correct, &selected).score;
            assert!(s <= previous);
            previous = s;
        }
    }

    #[test]
    fn growing_selection_moves_score_in_the_right_direction() {
        for difficulty in Difficulty::all() {
            let config = IdentificationConfig::for_difficulty(difficulty);
            for seed in 0..30 {
                let mut rng = StdRng::seed_from_u64(seed);
                let puzzle = generate(&config, &mut rng);
                let mut order: Vec<usize> = (0..puzzle.options.len()).collect();
                order.shuffle(&mut rng);

                let mut selected = Vec::new();
                let mut previous = score(&puzzle.correct_indices, &selected).score;
                assert_eq!(previous, 0.0);
                for index in order {
                    selected.push(index);
                    let current = score(&puzzle.correct_indices, &selected).score;
                    if puzzle.correct_indices.contains(&index) {
                        assert!(current >= previous, "seed {seed}: {selected:?}");
                    } else {
                        assert!(current <= previous, "seed {seed}: {selected:?}");
                    }
                    assert!(current >= 0.0);
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn duplicate_selection_counts_once() {
        assert_eq!(score(&[1], &[1, 1, 1]).score, 1.0);
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut selection = Selection::new();
        assert!(selection.toggle(3));
        assert!(selection.toggle(1));
        assert!(!selection.toggle(3));
        assert_eq!(selection.indices(), vec![1]);
    }

    #[test]
    fn tally_accumulates_floored_rounds() {
        let puzzle = IdentificationPuzzle {
            instruction: "Select all the fruits".into(),
            options: vec![],
            correct_indices: vec![0, 1, 2],
        };
        let mut tally = SessionTally::default();
        tally.record(&puzzle, &score(&[0, 1, 2], &[3, 4, 5, 6]));
        tally.record(&puzzle, &score(&[0, 1, 2], &[0, 1]));
        assert_eq!(tally.total, 2.0);
        assert_eq!(tally.rounds_played, 2);
        assert_eq!(tally.max_possible, 6.0);
    }
}
