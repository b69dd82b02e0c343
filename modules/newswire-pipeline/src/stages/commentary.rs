//! Commentary generation: a strictly sequential four-step chain against an
//! external service (persona -> approach -> draft -> quality score), run
//! three times per item, best candidate by score.

use std::time::Duration;

use async_trait::async_trait;
use newswire_common::{CommentaryCandidate, Config};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Per-step ceiling; draft generation is the slow step.
const STEP_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest text forwarded to the chain.
const MAX_CHAIN_TEXT: usize = 4000;

pub const CANDIDATES_PER_ITEM: usize = 3;

/// The generation chain behind a seam so the commentator worker can be
/// tested without the external service.
#[async_trait]
pub trait CommentaryService: Send + Sync {
    /// One full author->approach->write->assess pass. Never fails: any step
    /// failure yields the sentinel candidate (score 0).
    async fn candidate(&self, text: &str) -> CommentaryCandidate;

    /// Report the winning persona to the optional bookkeeping endpoint.
    /// Failures are logged, not retried.
    async fn report_best_author(&self, author: &str);
}

#[derive(Debug, Clone)]
pub struct ChainEndpoints {
    pub author_url: String,
    pub approach_url: String,
    pub write_url: String,
    pub assess_url: String,
    pub roster_url: Option<String>,
}

impl ChainEndpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            author_url: config.comment_author_url.clone(),
            approach_url: config.comment_approach_url.clone(),
            write_url: config.comment_write_url.clone(),
            assess_url: config.comment_assess_url.clone(),
            roster_url: config.comment_roster_url.clone(),
        }
    }
}

pub struct CommentaryChain {
    http: reqwest::Client,
    endpoints: ChainEndpoints,
}

impl CommentaryChain {
    pub fn new(endpoints: ChainEndpoints) -> Self {
        let http = reqwest::Client::builder()
            .timeout(STEP_TIMEOUT)
            .build()
            .expect("reqwest client construction");
        Self { http, endpoints }
    }

    /// POST one step. The service answers with a JSON array holding one
    /// object; anything else is a step failure.
    async fn post_step(&self, url: &str, payload: Value, step: &str) -> Option<Value> {
        let response = match self.http.post(url).json(&payload).send().await {
            Ok(r) => r,
            Err(err) => {
                warn!(step, %err, "commentary step request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(step, status = status.as_u16(), body, "commentary step rejected");
            return None;
        }

        let parsed: Value = match response.json().await {
            Ok(v) => v,
            Err(err) => {
                warn!(step, %err, "commentary step returned unparseable body");
                return None;
            }
        };

        match parsed {
            Value::Array(mut items) if !items.is_empty() => Some(items.remove(0)),
            other => {
                warn!(step, ?other, "commentary step returned unexpected shape");
                None
            }
        }
    }
}

fn field_str(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// The assess step sometimes returns the score as a string.
fn field_score(value: &Value, key: &str) -> Option<f32> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[async_trait]
impl CommentaryService for CommentaryChain {
    async fn candidate(&self, text: &str) -> CommentaryCandidate {
        let text = truncate_chars(text, MAX_CHAIN_TEXT);

        // Step 1: persona selection.
        let Some(author_step) = self
            .post_step(&self.endpoints.author_url, json!({ "text": text }), "author")
            .await
        else {
            return CommentaryCandidate::failed();
        };
        let Some(author) = field_str(&author_step, "author") else {
            warn!("author step missing 'author' field");
            return CommentaryCandidate::failed();
        };

        // Step 2: approach/strategy for that persona.
        let Some(approach) = self
            .post_step(
                &self.endpoints.approach_url,
                json!({ "text": text, "author": author }),
                "approach",
            )
            .await
        else {
            return CommentaryCandidate::failed();
        };

        // Step 3: draft generation from the strategy.
        let write_payload = json!({
            "text": text,
            "author": author,
            "device": field_str(&approach, "device").unwrap_or_default(),
            "structure": field_str(&approach, "structure").unwrap_or_default(),
            "goal": field_str(&approach, "goal").unwrap_or_default(),
            "idea": field_str(&approach, "idea").unwrap_or_default(),
        });
        let Some(draft) = self
            .post_step(&self.endpoints.write_url, write_payload, "write")
            .await
        else {
            return CommentaryCandidate::failed();
        };
        let (Some(comment), Some(draft_author)) =
            (field_str(&draft, "comment"), field_str(&draft, "author"))
        else {
            warn!("write step missing 'comment' or 'author' field");
            return CommentaryCandidate::failed();
        };

        // Step 4: quality score for the draft.
        let Some(assessment) = self
            .post_step(
                &self.endpoints.assess_url,
                json!({ "text": text, "rewrite": comment }),
                "assess",
            )
            .await
        else {
            return CommentaryCandidate::failed();
        };
        let Some(score) = field_score(&assessment, "score") else {
            warn!("assess step missing numeric 'score' field");
            return CommentaryCandidate::failed();
        };

        debug!(author = %draft_author, score, "commentary candidate complete");
        CommentaryCandidate { author: draft_author, text: comment, score }
    }

    async fn report_best_author(&self, author: &str) {
        let Some(url) = self.endpoints.roster_url.as_deref() else {
            return;
        };
        if self
            .post_step(url, json!({ "author": author }), "roster")
            .await
            .is_none()
        {
            warn!(author, "failed to report best author to roster");
        }
    }
}

/// Pick the best candidate: highest score, first on ties.
pub fn select_best(candidates: &[CommentaryCandidate]) -> &CommentaryCandidate {
    candidates
        .iter()
        .reduce(|best, c| if c.score > best.score { c } else { best })
        .expect("at least one candidate")
}

/// Blend the best commentary's score with the originating item's final
/// score. Weights come from config (defaults 0.7 / 0.3).
pub fn total_score(comment_score: f32, news_score: f32, comment_weight: f32, news_weight: f32) -> f32 {
    comment_weight * comment_score + news_weight * news_score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(author: &str, score: f32) -> CommentaryCandidate {
        CommentaryCandidate { author: author.into(), text: format!("by {author}"), score }
    }

    #[test]
    fn best_is_max_score_first_on_ties() {
        let candidates = [candidate("a", 4.0), candidate("b", 8.0), candidate("c", 8.0)];
        assert_eq!(select_best(&candidates).author, "b");
    }

    #[test]
    fn all_failed_candidates_still_select_a_best() {
        let candidates = [
            CommentaryCandidate::failed(),
            CommentaryCandidate::failed(),
            CommentaryCandidate::failed(),
        ];
        let best = select_best(&candidates);
        assert_eq!(best.score, 0.0);
        assert_eq!(best.author, "none");
    }

    #[test]
    fn total_score_blend() {
        let total = total_score(8.0, 6.0, 0.7, 0.3);
        assert!((total - 7.4).abs() < 1e-6);
    }

    #[test]
    fn score_field_coercion() {
        assert_eq!(field_score(&json!({ "score": 7.5 }), "score"), Some(7.5));
        assert_eq!(field_score(&json!({ "score": "7.5" }), "score"), Some(7.5));
        assert_eq!(field_score(&json!({ "score": [] }), "score"), None);
        assert_eq!(field_score(&json!({}), "score"), None);
    }

    #[test]
    fn string_field_coercion() {
        assert_eq!(field_str(&json!({ "author": "Twain" }), "author"), Some("Twain".into()));
        assert_eq!(field_str(&json!({ "author": 7 }), "author"), Some("7".into()));
        assert_eq!(field_str(&json!({ "author": null }), "author"), None);
    }

    #[test]
    fn chain_text_is_truncated() {
        let text = "y".repeat(5000);
        assert_eq!(truncate_chars(&text, MAX_CHAIN_TEXT).len(), 4000);
    }
}
