//! Scoring gateway: one retry/backoff policy wrapped around every
//! structured AI call the stages make.

use std::time::Duration;

use ai_client::{AiClient, AiError, ToolSchema};
use async_trait::async_trait;
use tracing::{error, warn};

use crate::prompts::{self, PromptSpec};
use crate::stages::{
    ContextVerdict, EssenceVerdict, InitialVerdict, MythVerdict, ShortTextVerdict, StageScorer,
    TagSet,
};

const MAX_ATTEMPTS: u32 = 3;

/// Stateless wrapper over the AI client shared by every stage.
///
/// Transient failures (rate limit, server error, connection, timeout) are
/// retried up to three times with exponential backoff; fatal ones (auth,
/// bad request, broken tool contract) return immediately. Callers never see
/// a crash out of this: each stage substitutes its documented safe default
/// when `score` comes back `None`.
#[derive(Clone)]
pub struct ScoringGateway {
    client: AiClient,
}

impl ScoringGateway {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    /// One scored call. `None` means the stage must fall back to its safe
    /// default; the cause has already been logged.
    pub async fn score<T: ToolSchema>(&self, spec: &PromptSpec, text: &str) -> Option<T> {
        with_retry(|| {
            self.client
                .tool_call::<T>(spec.system, text, spec.temperature, spec.max_tokens)
        })
        .await
    }
}

/// The retry policy, separated from the transport so it can be exercised
/// without an HTTP endpoint: up to three attempts on transient errors with
/// exponential backoff, immediate return on fatal ones.
async fn with_retry<T, F, Fut>(mut call: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ai_client::Result<T>>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        match call().await {
            Ok(result) => return Some(result),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                let delay = backoff(attempt);
                warn!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    %err,
                    "transient scoring failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                log_final_failure(&err, attempt);
                return None;
            }
        }
    }
    None
}

fn log_final_failure(err: &AiError, attempt: u32) {
    if err.is_transient() {
        error!(attempts = attempt, %err, "scoring failed after retries");
    } else {
        error!(%err, "fatal scoring failure, not retrying");
    }
}

/// `2^(attempt-1)` seconds: 1s, 2s, 4s.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1))
}

#[async_trait]
impl StageScorer for ScoringGateway {
    async fn initial(&self, text: &str) -> Option<InitialVerdict> {
        self.score(&prompts::INITIAL_FILTER, text).await
    }

    async fn context(&self, text: &str) -> Option<ContextVerdict> {
        self.score(&prompts::CONTEXT_FILTER, text).await
    }

    async fn essence(&self, text: &str) -> Option<EssenceVerdict> {
        self.score(&prompts::ESSENCE_FILTER, text).await
    }

    async fn tags(&self, text: &str) -> Option<TagSet> {
        self.score(&prompts::TAG_EXTRACTION, text).await
    }

    async fn shorten(&self, text: &str) -> Option<ShortTextVerdict> {
        self.score(&prompts::SHORTEN, text).await
    }

    async fn myth(&self, text: &str) -> Option<MythVerdict> {
        self.score(&prompts::MYTH, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn backoff_is_exponential() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_fails_without_retrying() {
        let calls = Cell::new(0u32);
        let result: Option<u32> = with_retry(|| {
            calls.set(calls.get() + 1);
            async {
                Err(AiError::Auth { status: 401, message: "bad key".into() })
            }
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_retry_exactly_three_times() {
        let calls = Cell::new(0u32);
        let result: Option<u32> = with_retry(|| {
            calls.set(calls.get() + 1);
            async { Err(AiError::Timeout) }
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_then_success_recovers() {
        let calls = Cell::new(0u32);
        let result = with_retry(|| {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt == 1 {
                    Err(AiError::RateLimited("slow down".into()))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result, Some(42));
        assert_eq!(calls.get(), 2);
    }
}
