//! Mock judge for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use cogplay_core::error::JudgeError;
use cogplay_core::games::then_what::Judgement;
use cogplay_core::judge::{IntentJudge, JudgeRequest};

/// A judge that returns a canned verdict, or a canned HTTP failure, without network access.
pub struct MockJudge {
    verdict: Judgement,
    /// When set, every call fails with this HTTP status.
    failure_status: Option<u16>,
    call_count: AtomicU32,
    last_request: Mutex<Option<JudgeRequest>>,
}

impl MockJudge {
    pub fn with_verdict(score: u32, feedback: &str) -> Self {
        Self {
            verdict: Judgement {
                score,
                feedback: feedback.to_string(),
            },
            failure_status: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A judge whose every call fails with an API error of the given status.
    pub fn failing(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::with_verdict(0, "")
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<JudgeRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IntentJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<Judgement, JudgeError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        match self.failure_status {
            Some(status) => Err(JudgeError::Api {
                status,
                message: "mock failure".into(),
            }),
            None => Ok(self.verdict.clone()),
        }
    }
}
