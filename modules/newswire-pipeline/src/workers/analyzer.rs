//! Runs the three-stage filter funnel over freshly ingested raw posts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::Config;
use sqlx::PgPool;
use tracing::{error, info};

use crate::stages::filters::run_filters;
use crate::stages::{FilterPolicy, StageScorer};
use crate::store::raw;

pub struct Analyzer {
    pool: PgPool,
    scorer: Arc<dyn StageScorer>,
    policy: FilterPolicy,
    interval: Duration,
    batch_size: i64,
}

impl Analyzer {
    pub fn new(pool: PgPool, scorer: Arc<dyn StageScorer>, config: &Config) -> Self {
        Self {
            pool,
            scorer,
            policy: FilterPolicy::from_config(config),
            interval: Duration::from_secs(config.analyzer_interval_secs),
            batch_size: config.analyzer_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "analyzer tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in raw::claim_ingested(&self.pool, self.batch_size).await? {
            let outcome = run_filters(self.scorer.as_ref(), &self.policy, &post.content).await;
            raw::store_outcome(&self.pool, post.id, &outcome).await?;
            info!(
                post_id = post.id,
                passed = outcome.passed(),
                context_score = outcome.context_score,
                essence_score = outcome.essence_score,
                "raw post filtered"
            );
        }
        Ok(())
    }
}
