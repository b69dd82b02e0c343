//! Shorten-then-myth chain: a compact display text, then a viral-potential
//! score computed on the short text.

use super::StageScorer;

/// What the shortener stage persists for one top-tier post.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenOutcome {
    /// `None` when shortening failed; the row still advances.
    pub short_text: Option<String>,
    pub myth_score: f32,
    pub myth_explanation: Option<String>,
}

impl ShortenOutcome {
    fn failed() -> Self {
        Self { short_text: None, myth_score: 0.0, myth_explanation: None }
    }
}

/// Run the two-call chain. The myth score is computed on the shortened text
/// and only when shortening succeeded; any failure degrades to score 0
/// rather than stalling the row.
pub async fn shorten_and_score(scorer: &dyn StageScorer, text: &str) -> ShortenOutcome {
    let short_text = match scorer.shorten(text).await {
        Some(verdict) if !verdict.short_text.trim().is_empty() => verdict.short_text,
        _ => return ShortenOutcome::failed(),
    };

    let (myth_score, myth_explanation) = match scorer.myth(&short_text).await {
        Some(verdict) => (verdict.myth_score, Some(verdict.explanation)),
        None => (0.0, None),
    };

    ShortenOutcome {
        short_text: Some(short_text),
        myth_score,
        myth_explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{
        ContextVerdict, EssenceVerdict, InitialVerdict, MythVerdict, ShortTextVerdict, TagSet,
    };
    use async_trait::async_trait;

    struct Scripted {
        short: Option<ShortTextVerdict>,
        myth: Option<MythVerdict>,
    }

    #[async_trait]
    impl StageScorer for Scripted {
        async fn initial(&self, _: &str) -> Option<InitialVerdict> {
            None
        }
        async fn context(&self, _: &str) -> Option<ContextVerdict> {
            None
        }
        async fn essence(&self, _: &str) -> Option<EssenceVerdict> {
            None
        }
        async fn tags(&self, _: &str) -> Option<TagSet> {
            None
        }
        async fn shorten(&self, _: &str) -> Option<ShortTextVerdict> {
            self.short.clone()
        }
        async fn myth(&self, _: &str) -> Option<MythVerdict> {
            self.myth.clone()
        }
    }

    #[tokio::test]
    async fn chain_success() {
        let scorer = Scripted {
            short: Some(ShortTextVerdict { short_text: "Mayor resigns.".into() }),
            myth: Some(MythVerdict { myth_score: 7.5, explanation: "scandal".into() }),
        };
        let outcome = shorten_and_score(&scorer, "long text").await;
        assert_eq!(outcome.short_text.as_deref(), Some("Mayor resigns."));
        assert_eq!(outcome.myth_score, 7.5);
    }

    #[tokio::test]
    async fn shorten_failure_skips_myth_scoring() {
        let scorer = Scripted {
            short: None,
            myth: Some(MythVerdict { myth_score: 9.0, explanation: "unused".into() }),
        };
        let outcome = shorten_and_score(&scorer, "long text").await;
        assert_eq!(outcome, ShortenOutcome::failed());
    }

    #[tokio::test]
    async fn myth_failure_degrades_to_zero() {
        let scorer = Scripted {
            short: Some(ShortTextVerdict { short_text: "Short.".into() }),
            myth: None,
        };
        let outcome = shorten_and_score(&scorer, "long text").await;
        assert_eq!(outcome.short_text.as_deref(), Some("Short."));
        assert_eq!(outcome.myth_score, 0.0);
        assert_eq!(outcome.myth_explanation, None);
    }
}
