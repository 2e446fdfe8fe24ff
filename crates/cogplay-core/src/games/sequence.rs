//! Sequence recall: remember a string of digits or a list of people.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// Tunables for the digit recall game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitConfig {
    /// Number of digits shown.
    pub length: usize,
    /// How long the sequence stays on screen.
    pub display_ms: u64,
}

impl DigitConfig {
    pub const EASY: DigitConfig = DigitConfig {
        length: 4,
        display_ms: 5000,
    };
    pub const MEDIUM: DigitConfig = DigitConfig {
        length: 6,
        display_ms: 4000,
    };
    pub const HARD: DigitConfig = DigitConfig {
        length: 8,
        display_ms: 3000,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> DigitConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

/// Result of comparing a recalled digit string with the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitScore {
    pub percent_correct: u32,
    pub exact_match: bool,
    pub correct_positions: usize,
}

pub fn generate_digits<R: Rng + ?Sized>(config: &DigitConfig, rng: &mut R) -> String {
    (0..config.length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Score a recalled digit string position by position.
///
/// Positions missing from a short response count as incorrect; extra
/// trailing characters cost the exact match but not the percentage.
pub fn score_digits(original: &str, response: &str) -> DigitScore {
    let expected: Vec<char> = original.chars().collect();
    let given: Vec<char> = response.chars().collect();

    let correct_positions = expected
        .iter()
        .zip(given.iter())
        .filter(|(a, b)| a == b)
        .count();

    let exact_match = original == response;
    let percent_correct = if expected.is_empty() {
        if exact_match {
            100
        } else {
            0
        }
    } else {
        (correct_positions as f64 / expected.len() as f64 * 100.0).round() as u32
    };

    DigitScore {
        percent_correct,
        exact_match,
        correct_positions,
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas",
    "Sarah", "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore",
    "Jackson", "Martin", "Lee", "Thompson", "White", "Harris", "Clark",
];

/// Tunables for the name recall game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConfig {
    /// Number of people to memorise.
    pub count: usize,
    pub study_secs: u64,
}

impl NameConfig {
    pub const EASY: NameConfig = NameConfig {
        count: 3,
        study_secs: 20,
    };
    pub const MEDIUM: NameConfig = NameConfig {
        count: 5,
        study_secs: 30,
    };
    pub const HARD: NameConfig = NameConfig {
        count: 7,
        study_secs: 40,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> NameConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

/// A person to remember, or the player's attempt at one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    fn matches(&self, other: &Person) -> bool {
        same_name(&self.first_name, &other.first_name) && same_name(&self.last_name, &other.last_name)
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Result of a name recall attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameScore {
    pub correct: usize,
    pub total: usize,
    /// `correct / total`, 0.0 for an empty list.
    pub fraction: f64,
    /// Whether each original person was recalled correctly.
    pub per_person: Vec<bool>,
}

/// Draw `config.count` people uniformly from the name pools. Duplicates are allowed.
pub fn generate_names<R: Rng + ?Sized>(config: &NameConfig, rng: &mut R) -> Vec<Person> {
    (0..config.count)
        .map(|_| {
            // Both pools are non-empty constants.
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
            Person::new(first, last)
        })
        .collect()
}

pub fn score_names(original: &[Person], response: &[Person]) -> NameScore {
    let per_person: Vec<bool> = original
        .iter()
        .enumerate()
        .map(|(i, person)| response.get(i).is_some_and(|r| person.matches(r)))
        .collect();

    let correct = per_person.iter().filter(|ok| **ok).count();
    let total = original.len();
    let fraction = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    NameScore {
        correct,
        total,
        fraction,
        per_person,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_digits_have_configured_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for difficulty in Difficulty::all() {
            let config = DigitConfig::for_difficulty(difficulty);
            let digits = generate_digits(&config, &mut rng);
            assert_eq!(digits.len(), config.length);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn identical_sequence_scores_full_marks() {
        let score = score_digits("482913", "482913");
        assert_eq!(score.percent_correct, 100);
        assert!(score.exact_match);
    }

    #[test]
    fn generated_sequences_score_full_and_empty_bounds() {
        for difficulty in Difficulty::all() {
            let config = DigitConfig::for_difficulty(difficulty);
            for seed in 0..50 {
                let digits = generate_digits(&config, &mut StdRng::seed_from_u64(seed));

                let same = score_digits(&digits, &digits);
                assert_eq!(same.percent_correct, 100, "{digits}");
                assert!(same.exact_match);
                assert_eq!(same.correct_positions, config.length);

                let blank = score_digits(&digits, "");
                assert_eq!(blank.percent_correct, 0, "{digits}");
                assert!(!blank.exact_match);
            }
        }
    }

    #[test]
    fn half_correct_sequence() {
        let score = score_digits("482913", "482000");
        assert_eq!(score.correct_positions, 3);
        assert_eq!(score.percent_correct, 50);
        assert!(!score.exact_match);
    }

    #[test]
    fn empty_response_scores_zero() {
        let score = score_digits("482913", "");
        assert_eq!(score.percent_correct, 0);
        assert!(!score.exact_match);
    }

    #[test]
    fn short_response_counts_tail_as_wrong() {
        let score = score_digits("1234", "12");
        assert_eq!(score.percent_correct, 50);
    }

    #[test]
    fn long_response_is_not_exact() {
        let score = score_digits("1234", "12345");
        assert_eq!(score.percent_correct, 100);
        assert!(!score.exact_match);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        // 2 of 3 = 66.67%
        assert_eq!(score_digits("123", "120").percent_correct, 67);
    }

    #[test]
    fn generated_names_come_from_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let people = generate_names(&NameConfig::HARD, &mut rng);
        assert_eq!(people.len(), 7);
        for p in &people {
            assert!(FIRST_NAMES.contains(&p.first_name.as_str()));
            assert!(LAST_NAMES.contains(&p.last_name.as_str()));
        }
    }

    #[test]
    fn names_match_case_insensitively() {
        let original = vec![Person::new("Mary", "Smith"), Person::new("John", "Lee")];
        let response = vec![Person::new("mary", " SMITH "), Person::new("John", "Clark")];
        let score = score_names(&original, &response);
        assert_eq!(score.correct, 1);
        assert_eq!(score.per_person, vec![true, false]);
        assert!((score.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_people_count_as_incorrect() {
        let original = vec![Person::new("Mary", "Smith"), Person::new("John", "Lee")];
        let response = vec![Person::new("Mary", "Smith")];
        let score = score_names(&original, &response);
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 2);
    }
}
