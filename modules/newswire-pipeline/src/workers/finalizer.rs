//! Applies the final-score formula to shortened top-tier posts and promotes
//! the ones that clear the acceptance threshold into the top-top tier.

use std::time::Duration;

use anyhow::Result;
use newswire_common::{Config, TopState};
use sqlx::PgPool;
use tracing::{error, info};

use crate::aggregate::ScorePolicy;
use crate::store::{top, top_top};

pub struct Finalizer {
    pool: PgPool,
    policy: ScorePolicy,
    interval: Duration,
    batch_size: i64,
}

impl Finalizer {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            policy: ScorePolicy::from_config(config),
            interval: Duration::from_secs(config.finalizer_interval_secs),
            batch_size: config.finalizer_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "finalizer tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in top::claim_shortened(&self.pool, self.batch_size).await? {
            let final_score =
                self.policy
                    .final_score(post.essence_score, post.coincide, post.myth_score);

            let state = if self.policy.passes(final_score) {
                let top_top_id = top_top::insert_from_top(&self.pool, &post, final_score).await?;
                info!(post_id = post.id, top_top_id, final_score, "post accepted");
                TopState::Accepted
            } else {
                info!(
                    post_id = post.id,
                    final_score,
                    coincide = post.coincide,
                    "post below final threshold"
                );
                TopState::Rejected
            };

            top::finalize(&self.pool, post.id, final_score, state).await?;
        }
        Ok(())
    }
}
