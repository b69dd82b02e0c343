//! End-to-end scoring flow without the database: filter funnel, facet
//! extraction, embedding, novelty, and the final-score verdict, with the
//! AI seams scripted.

use std::sync::Arc;

use async_trait::async_trait;

use newswire_common::{Facets, TextEmbedder, EMBEDDING_DIM, FACET_COUNT};
use newswire_pipeline::aggregate::ScorePolicy;
use newswire_pipeline::embedding::EmbeddingEngine;
use newswire_pipeline::novelty::{score_novelty, PriorVectors, SimilarityMetric};
use newswire_pipeline::stages::filters::run_filters;
use newswire_pipeline::stages::tagger::extract_facets;
use newswire_pipeline::stages::{
    ContextVerdict, EssenceVerdict, FilterPolicy, InitialVerdict, MythVerdict, ShortTextVerdict,
    StageScorer, TagSet,
};

const POLICY: FilterPolicy = FilterPolicy {
    context_threshold: 6.0,
    essence_threshold: 6.0,
    essence_max_threshold: 8.0,
};

/// Scorer that treats any text mentioning "advert" as inadmissible and
/// everything else as a solid news item.
struct NewsDeskScorer;

#[async_trait]
impl StageScorer for NewsDeskScorer {
    async fn initial(&self, text: &str) -> Option<InitialVerdict> {
        Some(InitialVerdict {
            passed: !text.contains("advert"),
            explanation: "admissibility checked".into(),
        })
    }
    async fn context(&self, _: &str) -> Option<ContextVerdict> {
        Some(ContextVerdict { score: 7.0, explanation: "regional".into() })
    }
    async fn essence(&self, _: &str) -> Option<EssenceVerdict> {
        Some(EssenceVerdict { score: 7.5, max_score: 8.5, explanation: "strong lead".into() })
    }
    async fn tags(&self, _: &str) -> Option<TagSet> {
        Some(TagSet {
            subject: Some("city council".into()),
            action: Some("approves budget".into()),
            time_place: Some("tuesday, city hall".into()),
            reason: None,
            source: Some("council press office".into()),
        })
    }
    async fn shorten(&self, _: &str) -> Option<ShortTextVerdict> {
        Some(ShortTextVerdict { short_text: "Council approves budget.".into() })
    }
    async fn myth(&self, _: &str) -> Option<MythVerdict> {
        Some(MythVerdict { myth_score: 2.0, explanation: "routine".into() })
    }
}

/// Encoder that maps each distinct text to its own orthogonal unit vector,
/// so identical facets are identical vectors and different facets are
/// dissimilar.
struct OrthogonalEncoder;

#[async_trait]
impl TextEmbedder for OrthogonalEncoder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut v = vec![0.0; EMBEDDING_DIM];
        let slot = text.bytes().map(usize::from).sum::<usize>() % EMBEDDING_DIM;
        v[slot] = 1.0;
        Ok(v)
    }
}

async fn facet_vectors(engine: &EmbeddingEngine, facets: &Facets) -> [Vec<f32>; FACET_COUNT] {
    let mut vectors: [Vec<f32>; FACET_COUNT] = Default::default();
    for (slot, facet) in vectors.iter_mut().zip(facets.as_array()) {
        *slot = engine.facet_vector(facet).await;
    }
    vectors
}

#[tokio::test]
async fn admissible_post_flows_to_acceptance() {
    let scorer = NewsDeskScorer;
    let outcome = run_filters(&scorer, &POLICY, "Council approves the annual budget").await;
    assert!(outcome.passed());

    let facets = extract_facets(&scorer, "Council approves the annual budget").await;
    assert_eq!(facets.subject.as_deref(), Some("city council"));
    assert!(facets.reason.is_none());

    let engine = EmbeddingEngine::new(Arc::new(OrthogonalEncoder));
    let vectors = facet_vectors(&engine, &facets).await;

    // Nothing in history: fully novel, only the base penalty applies.
    let novelty = score_novelty(SimilarityMetric::Combined, &vectors, &[]);
    assert_eq!(novelty.coincide, 0.0);

    let policy = ScorePolicy::new(6.0);
    let final_score = policy.final_score(outcome.essence_score, novelty.coincide, 2.0);
    assert!((final_score - 7.0).abs() < 1e-6);
    assert!(policy.passes(final_score));
}

#[tokio::test]
async fn repeat_of_recent_story_is_rejected() {
    let scorer = NewsDeskScorer;
    let engine = EmbeddingEngine::new(Arc::new(OrthogonalEncoder));

    let facets = extract_facets(&scorer, "Council approves the annual budget").await;
    let vectors = facet_vectors(&engine, &facets).await;

    // The same story was accepted moments ago.
    let prior = PriorVectors { id: 1, vectors: vectors.clone() };
    let novelty = score_novelty(SimilarityMetric::Combined, &vectors, &[prior]);
    assert_eq!(novelty.coincide, 1.0);

    let policy = ScorePolicy::new(6.0);
    let final_score = policy.final_score(7.5, novelty.coincide, 2.0);
    assert!((final_score - 5.5).abs() < 1e-6);
    assert!(!policy.passes(final_score));
}

#[tokio::test]
async fn advert_never_reaches_the_scorers() {
    let outcome = run_filters(&NewsDeskScorer, &POLICY, "advert: buy two get one").await;
    assert!(!outcome.passed());
    assert_eq!(outcome.context_score, 0.0);
    assert_eq!(outcome.essence_score, 0.0);
}
