//! Embeds the facets of tagged top-tier posts and scores their novelty
//! against the recent accepted history. Runs on the dedicated long-query
//! pool: encoder calls and the vector fetch are the slow path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::{Config, FACET_COUNT};
use sqlx::PgPool;
use tracing::{error, info};

use crate::embedding::EmbeddingEngine;
use crate::novelty::{score_novelty, SimilarityMetric};
use crate::store::top;

pub struct Embedder {
    pool: PgPool,
    engine: Arc<EmbeddingEngine>,
    metric: SimilarityMetric,
    window: i64,
    interval: Duration,
    batch_size: i64,
}

impl Embedder {
    pub fn new(
        pool: PgPool,
        engine: Arc<EmbeddingEngine>,
        metric: SimilarityMetric,
        config: &Config,
    ) -> Self {
        Self {
            pool,
            engine,
            metric,
            window: config.novelty_window,
            interval: Duration::from_secs(config.embedder_interval_secs),
            batch_size: config.embedder_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "embedder tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in top::claim_tagged(&self.pool, self.batch_size).await? {
            let facets = post.facets.as_array();
            let mut vectors: [Vec<f32>; FACET_COUNT] = Default::default();
            for (slot, facet) in vectors.iter_mut().zip(facets) {
                *slot = self.engine.facet_vector(facet).await;
            }

            let priors = top::fetch_prior_vectors(&self.pool, post.id, self.window).await?;
            let scores = score_novelty(self.metric, &vectors, &priors);
            top::store_novelty(&self.pool, post.id, &vectors, &scores).await?;

            info!(
                post_id = post.id,
                priors = priors.len(),
                coincide = scores.coincide,
                "novelty scored"
            );
        }
        Ok(())
    }
}
