//! HTTP intent judge.
//!
//! POSTs `{"instruction", "response"}` as JSON to a configured endpoint and
//! expects `{"score", "feedback"}` back.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cogplay_core::error::JudgeError;
use cogplay_core::games::then_what::{feedback_for, Judgement, NO_RESPONSE_FEEDBACK};
use cogplay_core::judge::{IntentJudge, JudgeRequest};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// A language-model judge behind an HTTP endpoint.
pub struct RemoteJudge {
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl RemoteJudge {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| JudgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout_secs,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct RemoteRequest<'a> {
    instruction: &'a str,
    response: &'a str,
}

#[derive(Deserialize)]
struct RemoteVerdict {
    score: f64,
    #[serde(default)]
    feedback: String,
}

#[async_trait]
impl IntentJudge for RemoteJudge {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError> {
        if request.response.trim().is_empty() {
            return Ok(Judgement {
                score: 0,
                feedback: NO_RESPONSE_FEEDBACK.to_string(),
            });
        }

        let start = Instant::now();
        let body = RemoteRequest {
            instruction: &request.instruction,
            response: &request.response,
        };

        let mut req = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                JudgeError::Timeout(self.timeout_secs)
            } else {
                JudgeError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Api {
                status,
                message: body,
            });
        }

        let verdict: RemoteVerdict = response
            .json()
            .await
            .map_err(|e| JudgeError::InvalidResponse(format!("failed to parse verdict: {e}")))?;

        if !verdict.score.is_finite() {
            return Err(JudgeError::InvalidResponse(format!(
                "score is not a number: {}",
                verdict.score
            )));
        }

        let score = verdict.score.clamp(0.0, 100.0).round() as u32;
        let feedback = if verdict.feedback.trim().is_empty() {
            feedback_for(score).to_string()
        } else {
            verdict.feedback
        };

        tracing::debug!(score, latency_ms = start.elapsed().as_millis() as u64, "remote verdict");
        Ok(Judgement { score, feedback })
    }
}
