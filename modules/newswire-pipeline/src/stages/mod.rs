//! Stage verdict types and the scoring seam the workers call through.

pub mod commentary;
pub mod filters;
pub mod shortener;
pub mod tagger;

pub use filters::{FilterOutcome, FilterPolicy};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

// --- Structured verdicts the AI must return, one per stage ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InitialVerdict {
    /// Whether the message is admissible as a news item at all.
    pub passed: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContextVerdict {
    /// Contextual relevance, 0-10.
    pub score: f32,
    pub explanation: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EssenceVerdict {
    /// Overall newsworthiness, 0-10.
    pub score: f32,
    /// Strength of the single strongest newsworthy element, 0-10.
    pub max_score: f32,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TagSet {
    pub subject: Option<String>,
    pub action: Option<String>,
    pub time_place: Option<String>,
    pub reason: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShortTextVerdict {
    pub short_text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MythVerdict {
    /// Viral potential, 0-10.
    pub myth_score: f32,
    pub explanation: String,
}

/// Every stage call behind one mockable seam. The production implementation
/// is [`crate::gateway::ScoringGateway`]; `None` always means "scoring
/// failed after the gateway's retry policy, use the stage's safe default".
#[async_trait]
pub trait StageScorer: Send + Sync {
    async fn initial(&self, text: &str) -> Option<InitialVerdict>;
    async fn context(&self, text: &str) -> Option<ContextVerdict>;
    async fn essence(&self, text: &str) -> Option<EssenceVerdict>;
    async fn tags(&self, text: &str) -> Option<TagSet>;
    async fn shorten(&self, text: &str) -> Option<ShortTextVerdict>;
    async fn myth(&self, text: &str) -> Option<MythVerdict>;
}
