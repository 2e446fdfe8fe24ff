//! Then what: read an instruction, then describe from memory what to do.
//!
//! Responses are free text, so they are judged by intent rather than by
//! exact match. [`heuristic_judge`] scores keyword, number and word overlap
//! and is the fallback whenever no language-model judge is configured.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

const CLICK_POINTS: f64 = 30.0;
const COLOR_POINTS: f64 = 25.0;
const SHAPE_POINTS: f64 = 20.0;
const NUMBER_POINTS: f64 = 30.0;
const WORD_POINTS: f64 = 25.0;

const COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "black", "white",
];
const SHAPES: &[&str] = &["square", "circle", "triangle", "star", "diamond", "heart"];
const SAY_WORDS: &[&str] = &["sunflower", "harbour", "lantern", "meadow", "violin", "pebble"];

pub const NO_RESPONSE_FEEDBACK: &str = "No response provided.";

/// Tunables for the then-what game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThenWhatConfig {
    /// Number of clauses chained into the instruction.
    pub steps: usize,
    pub display_secs: u64,
}

impl ThenWhatConfig {
    pub const EASY: ThenWhatConfig = ThenWhatConfig {
        steps: 1,
        display_secs: 10,
    };
    pub const MEDIUM: ThenWhatConfig = ThenWhatConfig {
        steps: 2,
        display_secs: 12,
    };
    pub const HARD: ThenWhatConfig = ThenWhatConfig {
        steps: 3,
        display_secs: 15,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> ThenWhatConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThenWhatPuzzle {
    pub instruction: String,
}

/// A verdict on how well a response captures an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    /// 0 to 100.
    pub score: u32,
    pub feedback: String,
}

fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn clause<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.random_range(0..3) {
        0 => format!(
            "click the {} {} {} times",
            pick(COLORS, rng),
            pick(SHAPES, rng),
            rng.random_range(2..=5)
        ),
        1 => format!("type the number {}", rng.random_range(10..100)),
        _ => format!("say the word \"{}\"", pick(SAY_WORDS, rng)),
    }
}

pub fn generate<R: Rng + ?Sized>(config: &ThenWhatConfig, rng: &mut R) -> ThenWhatPuzzle {
    let clauses: Vec<String> = (0..config.steps.max(1)).map(|_| clause(rng)).collect();

    let sentence = match clauses.as_slice() {
        [only] => only.clone(),
        [first, second] => format!("first {first}, then {second}"),
        [first, middle @ .., last] => format!(
            "first {first}, then {}, and finally {last}",
            middle.join(", then ")
        ),
        [] => String::new(),
    };

    let mut chars = sentence.chars();
    let instruction = match chars.next() {
        Some(c) => format!("{}{}.", c.to_uppercase(), chars.as_str()),
        None => String::new(),
    };
    ThenWhatPuzzle { instruction }
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn shares_any(a: &HashSet<&str>, b: &HashSet<&str>, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|w| a.contains(w) && b.contains(w))
}

fn fraction_present(needles: &[&str], haystack: &HashSet<&str>) -> f64 {
    if needles.is_empty() {
        return 0.0;
    }
    let hits = needles.iter().filter(|n| haystack.contains(*n)).count();
    hits as f64 / needles.len() as f64
}

/// Score a free-text response against the instruction it should recall.
pub fn heuristic_judge(instruction: &str, response: &str) -> Judgement {
    if response.trim().is_empty() {
        return Judgement {
            score: 0,
            feedback: NO_RESPONSE_FEEDBACK.to_string(),
        };
    }

    let instruction_tokens = tokens(instruction);
    let response_tokens = tokens(response);
    let inst: HashSet<&str> = instruction_tokens.iter().map(String::as_str).collect();
    let resp: HashSet<&str> = response_tokens.iter().map(String::as_str).collect();

    let mut score = 0.0;

    if instruction.to_lowercase().contains("click") && response.to_lowercase().contains("click") {
        score += CLICK_POINTS;
    }
    if shares_any(&inst, &resp, COLORS) {
        score += COLOR_POINTS;
    }
    if shares_any(&inst, &resp, SHAPES) {
        score += SHAPE_POINTS;
    }

    let numbers: Vec<&str> = instruction_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| t.chars().all(|c| c.is_ascii_digit()))
        .collect();
    score += NUMBER_POINTS * fraction_present(&numbers, &resp);

    let words: Vec<&str> = instruction_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| t.chars().count() > 2)
        .collect();
    score += WORD_POINTS * fraction_present(&words, &resp);

    let score = score.clamp(0.0, 100.0).round() as u32;
    Judgement {
        score,
        feedback: feedback_for(score).to_string(),
    }
}

/// Feedback line for a 0-100 score.
pub fn feedback_for(score: u32) -> &'static str {
    match score {
        80.. => "Excellent! Your response closely matches the instruction.",
        60..=79 => "Good job! You remembered most of the instruction.",
        40..=59 => "Partially correct. You remembered some key parts of the instruction.",
        20..=39 => "You got some elements right, but missed important details.",
        _ => "Your response doesn't match the instruction.",
    }
}
