//! The three-stage admissibility funnel with short-circuit.

use newswire_common::Config;

use super::{ContextVerdict, EssenceVerdict, InitialVerdict, StageScorer};

pub const NOT_EVALUATED: &str = "not evaluated";
pub const SCORING_FAILED: &str = "scoring failed; rejected by default";

/// Externally configured cutoffs. All comparisons are `>=`.
#[derive(Debug, Clone, Copy)]
pub struct FilterPolicy {
    pub context_threshold: f32,
    pub essence_threshold: f32,
    pub essence_max_threshold: f32,
}

impl FilterPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            context_threshold: config.context_threshold,
            essence_threshold: config.essence_threshold,
            essence_max_threshold: config.essence_max_threshold,
        }
    }
}

/// Everything the filter funnel persists for one raw post.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub initial_passed: bool,
    pub initial_explanation: String,
    pub context_passed: bool,
    pub context_score: f32,
    pub context_explanation: String,
    pub essence_passed: bool,
    pub essence_score: f32,
    pub essence_max: f32,
    pub essence_explanation: String,
}

impl FilterOutcome {
    /// The funnel verdict: every stage passed.
    pub fn passed(&self) -> bool {
        self.initial_passed && self.context_passed && self.essence_passed
    }
}

/// Run the funnel for one post. The contextual stage is skipped when the
/// initial filter rejects; the essence stage is skipped when either the
/// initial filter or the contextual threshold fails. A failed gateway call
/// at any stage records the safe default (fail, zero score); a row that
/// cannot be scored is never promoted.
pub async fn run_filters(
    scorer: &dyn StageScorer,
    policy: &FilterPolicy,
    text: &str,
) -> FilterOutcome {
    let (initial_passed, initial_explanation) = match scorer.initial(text).await {
        Some(InitialVerdict { passed, explanation }) => (passed, explanation),
        None => (false, SCORING_FAILED.to_string()),
    };

    let (context_passed, context_score, context_explanation) = if !initial_passed {
        (false, 0.0, NOT_EVALUATED.to_string())
    } else {
        match scorer.context(text).await {
            Some(ContextVerdict { score, explanation }) => {
                (score >= policy.context_threshold, score, explanation)
            }
            None => (false, 0.0, SCORING_FAILED.to_string()),
        }
    };

    let (essence_passed, essence_score, essence_max, essence_explanation) =
        if !initial_passed || !context_passed {
            (false, 0.0, 0.0, NOT_EVALUATED.to_string())
        } else {
            match scorer.essence(text).await {
                Some(EssenceVerdict { score, max_score, explanation }) => {
                    let passed = score >= policy.essence_threshold
                        && max_score >= policy.essence_max_threshold;
                    (passed, score, max_score, explanation)
                }
                None => (false, 0.0, 0.0, SCORING_FAILED.to_string()),
            }
        };

    FilterOutcome {
        initial_passed,
        initial_explanation,
        context_passed,
        context_score,
        context_explanation,
        essence_passed,
        essence_score,
        essence_max,
        essence_explanation,
    }
}
