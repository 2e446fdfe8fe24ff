//! Error types.
//!
//! Scorers and generators are total over well-formed inputs; these errors
//! cover the places where a caller can hand over something malformed
//! (a puzzle paired with a response from another game, or settings out of
//! range) and the remote
//! judge, whose failures the judge crate classifies for fallback decisions.

use thiserror::Error;

use crate::model::GameKind;

/// Errors raised when a puzzle and a response do not belong together.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The response was produced for a different game than the puzzle.
    #[error("response for {response} cannot score a {puzzle} puzzle")]
    Mismatch { puzzle: GameKind, response: GameKind },

    /// A grid coordinate outside the puzzle.
    #[error("cell ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// Puzzle settings no generator produces, e.g. from a hand-edited file.
    #[error("invalid {game} settings: {message}")]
    InvalidConfig { game: GameKind, message: String },
}

/// Errors that can occur when asking an intent judge for a verdict.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The judge endpoint rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The judge endpoint returned an error response.
    #[error("judge API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("judge request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with something that is not a verdict.
    #[error("invalid judge response: {0}")]
    InvalidResponse(String),
}

impl JudgeError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            JudgeError::AuthenticationFailed(_) | JudgeError::InvalidResponse(_)
        )
    }
}
