//! Extracts the five semantic facets from pending top-tier posts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::Config;
use sqlx::PgPool;
use tracing::{error, info};

use crate::stages::tagger::extract_facets;
use crate::stages::StageScorer;
use crate::store::top;

pub struct Tagger {
    pool: PgPool,
    scorer: Arc<dyn StageScorer>,
    interval: Duration,
    batch_size: i64,
}

impl Tagger {
    pub fn new(pool: PgPool, scorer: Arc<dyn StageScorer>, config: &Config) -> Self {
        Self {
            pool,
            scorer,
            interval: Duration::from_secs(config.tagger_interval_secs),
            batch_size: config.tagger_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "tagger tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in top::claim_pending(&self.pool, self.batch_size).await? {
            let facets = extract_facets(self.scorer.as_ref(), &post.content).await;
            top::store_facets(&self.pool, post.id, &facets).await?;
            info!(post_id = post.id, empty = facets.is_empty(), "facets extracted");
        }
        Ok(())
    }
}
