//! Odd one out: spot the word that does not belong with the others.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// Tunables for the odd-one-out game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddOneOutConfig {
    /// Words shown per puzzle, including the odd one.
    pub word_count: usize,
    pub rounds: usize,
}

impl OddOneOutConfig {
    pub const EASY: OddOneOutConfig = OddOneOutConfig {
        word_count: 4,
        rounds: 10,
    };
    pub const MEDIUM: OddOneOutConfig = OddOneOutConfig {
        word_count: 5,
        rounds: 10,
    };
    pub const HARD: OddOneOutConfig = OddOneOutConfig {
        word_count: 6,
        rounds: 10,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> OddOneOutConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

struct Category {
    name: &'static str,
    words: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "fruits",
        words: &["apple", "banana", "cherry", "grape", "mango", "pear", "plum", "peach"],
    },
    Category {
        name: "vehicles",
        words: &["car", "bus", "train", "bicycle", "truck", "tram", "scooter", "van"],
    },
    Category {
        name: "furniture",
        words: &["chair", "table", "sofa", "bed", "desk", "wardrobe", "stool", "bench"],
    },
    Category {
        name: "weather",
        words: &["rain", "snow", "wind", "fog", "hail", "sunshine", "storm", "drizzle"],
    },
    Category {
        name: "instruments",
        words: &["piano", "violin", "guitar", "drum", "flute", "trumpet", "harp", "cello"],
    },
    Category {
        name: "body parts",
        words: &["arm", "leg", "hand", "foot", "knee", "elbow", "shoulder", "ankle"],
    },
];

/// One odd-one-out puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddOneOutPuzzle {
    pub words: Vec<String>,
    /// Position of the word that does not belong to `category`.
    pub correct_index: usize,
    pub category: String,
}

impl OddOneOutPuzzle {
    pub fn odd_word(&self) -> Option<&str> {
        self.words.get(self.correct_index).map(String::as_str)
    }
}

/// Build a puzzle with exactly one word outside the chosen category.
///
/// Half the time the similar words are drawn first and the distractor is
/// inserted at a random position; otherwise a full set of similar words is
/// drawn and one position is overwritten with the distractor.
pub fn generate<R: Rng + ?Sized>(config: &OddOneOutConfig, rng: &mut R) -> OddOneOutPuzzle {
    // CATEGORIES is a non-empty constant.
    let category = CATEGORIES.choose(rng).unwrap_or(&CATEGORIES[0]);
    let word_count = config.word_count.clamp(2, category.words.len() + 1);

    let distractors: Vec<&str> = CATEGORIES
        .iter()
        .filter(|c| c.name != category.name)
        .flat_map(|c| c.words.iter().copied())
        .filter(|w| !category.words.contains(w))
        .collect();
    let distractor = distractors.choose(rng).copied().unwrap_or("stone");

    let (words, correct_index) = if rng.random_bool(0.5) {
        let mut words: Vec<String> = category
            .words
            .choose_multiple(rng, word_count - 1)
            .map(|w| w.to_string())
            .collect();
        let position = rng.random_range(0..=words.len());
        words.insert(position, distractor.to_string());
        (words, position)
    } else {
        let mut similar: Vec<&str> = category.words.to_vec();
        similar.shuffle(rng);
        let take = word_count.min(similar.len());
        let mut words: Vec<String> = similar[..take].iter().map(|w| w.to_string()).collect();
        let position = rng.random_range(0..words.len());
        words[position] = distractor.to_string();
        (words, position)
    };

    OddOneOutPuzzle {
        words,
        correct_index,
        category: category.name.to_string(),
    }
}

pub fn score(correct_index: usize, selected_index: usize) -> bool {
    correct_index == selected_index
}

/// Correct answers over the rounds of one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: usize,
    pub answered: usize,
}

impl Tally {
    pub fn record(&mut self, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
    }
}
