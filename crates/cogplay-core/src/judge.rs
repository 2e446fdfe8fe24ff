//! Intent judge trait.
//!
//! The then-what game can be judged by a language model behind an HTTP
//! endpoint (implemented in `cogplay-judge`) or by the built-in keyword
//! heuristic. Both sit behind [`IntentJudge`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::JudgeError;
use crate::games::then_what::{heuristic_judge, Judgement};

/// Something that can decide how well a free-text response recalls an instruction.
#[async_trait]
pub trait IntentJudge: Send + Sync {
    /// Human-readable judge name (e.g. "heuristic").
    fn name(&self) -> &str;

    /// Judge one response.
    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError>;
}

#[async_trait]
impl<T: IntentJudge + ?Sized> IntentJudge for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError> {
        (**self).judge(request).await
    }
}

/// An instruction and the player's recollection of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub instruction: String,
    pub response: String,
}

impl JudgeRequest {
    pub fn new(instruction: &str, response: &str) -> Self {
        Self {
            instruction: instruction.to_string(),
            response: response.to_string(),
        }
    }
}

/// Keyword-overlap judge; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicJudge;

#[async_trait]
impl IntentJudge for HeuristicJudge {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError> {
        Ok(heuristic_judge(&request.instruction, &request.response))
    }
}
