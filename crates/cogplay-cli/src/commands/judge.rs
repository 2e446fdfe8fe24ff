//! The `cogplay judge` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::Semaphore;

use cogplay_core::games::then_what::Judgement;
use cogplay_core::judge::{IntentJudge, JudgeRequest};

#[derive(Serialize)]
struct BatchVerdict {
    instruction: String,
    response: String,
    #[serde(flatten)]
    judgement: Judgement,
}

pub async fn execute(
    instruction: Option<String>,
    response: Option<String>,
    batch: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = cogplay_judge::load_config_from(config_path.as_deref())?;
    let judge: Arc<dyn IntentJudge> = Arc::from(cogplay_judge::create_judge(&config.judge)?);
    tracing::debug!(judge = judge.name(), "using judge");

    match (instruction, response, batch) {
        (Some(instruction), Some(response), None) => {
            let verdict = judge.judge(&JudgeRequest::new(&instruction, &response)).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        (None, None, Some(path)) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read batch file: {}", path.display()))?;
            let requests: Vec<JudgeRequest> = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse batch file: {}", path.display()))?;

            let verdicts = judge_batch(judge, requests, config.judge_parallelism).await?;
            println!("{}", serde_json::to_string_pretty(&verdicts)?);
        }
        _ => anyhow::bail!("pass either --instruction and --response, or --batch"),
    }

    Ok(())
}

/// Judge every request with at most `parallelism` in flight, keeping input order.
async fn judge_batch(
    judge: Arc<dyn IntentJudge>,
    requests: Vec<JudgeRequest>,
    parallelism: usize,
) -> Result<Vec<BatchVerdict>> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let semaphore = Arc::new(Semaphore::new(parallelism));
    let total = requests.len();

    let mut futures = FuturesUnordered::new();
    for (index, request) in requests.into_iter().enumerate() {
        let judge = Arc::clone(&judge);
        let semaphore = Arc::clone(&semaphore);
        futures.push(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
            let judgement = judge.judge(&request).await?;
            anyhow::Ok((index, request, judgement))
        });
    }

    let mut verdicts = Vec::with_capacity(total);
    while let Some(result) = futures.next().await {
        let (index, request, judgement) = result?;
        tracing::debug!(index, total, score = judgement.score, "judged");
        verdicts.push((
            index,
            BatchVerdict {
                instruction: request.instruction,
                response: request.response,
                judgement,
            },
        ));
    }

    verdicts.sort_by_key(|(index, _)| *index);
    Ok(verdicts.into_iter().map(|(_, v)| v).collect())
}
