//! Primary judge with a heuristic safety net.

use async_trait::async_trait;

use cogplay_core::error::JudgeError;
use cogplay_core::games::then_what::Judgement;
use cogplay_core::judge::{HeuristicJudge, IntentJudge, JudgeRequest};

/// Asks the primary judge first and answers with the keyword heuristic if it fails.
pub struct FallbackJudge {
    primary: Box<dyn IntentJudge>,
    fallback: HeuristicJudge,
    name: String,
}

impl FallbackJudge {
    pub fn new(primary: Box<dyn IntentJudge>) -> Self {
        let name = format!("{}+heuristic", primary.name());
        Self {
            primary,
            fallback: HeuristicJudge,
            name,
        }
    }
}

#[async_trait]
impl IntentJudge for FallbackJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError> {
        match self.primary.judge(request).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => {
                tracing::warn!(
                    judge = self.primary.name(),
                    error = %e,
                    "judge failed, falling back to heuristic"
                );
                self.fallback.judge(request).await
            }
        }
    }
}
