//! Produces the shortened display text and the myth score for novelty-scored
//! top-tier posts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::Config;
use sqlx::PgPool;
use tracing::{error, info};

use crate::stages::shortener::shorten_and_score;
use crate::stages::StageScorer;
use crate::store::top;

pub struct Shortener {
    pool: PgPool,
    scorer: Arc<dyn StageScorer>,
    interval: Duration,
    batch_size: i64,
}

impl Shortener {
    pub fn new(pool: PgPool, scorer: Arc<dyn StageScorer>, config: &Config) -> Self {
        Self {
            pool,
            scorer,
            interval: Duration::from_secs(config.shortener_interval_secs),
            batch_size: config.shortener_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "shortener tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in top::claim_scored(&self.pool, self.batch_size).await? {
            let outcome = shorten_and_score(self.scorer.as_ref(), &post.content).await;
            top::store_short(&self.pool, post.id, &outcome).await?;
            info!(
                post_id = post.id,
                shortened = outcome.short_text.is_some(),
                myth_score = outcome.myth_score,
                "post shortened"
            );
        }
        Ok(())
    }
}
