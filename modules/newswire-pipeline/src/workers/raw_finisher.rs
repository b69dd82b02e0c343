//! Settles filtered raw posts: promotes the passing ones into the top tier
//! and delivers them to the private destination, rejects the rest.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::{Config, RawState};
use sqlx::PgPool;
use telegram_client::TelegramClient;
use tracing::{error, info, warn};

use crate::store::raw::{self, ScoredRawPost};
use crate::store::top;

pub struct RawFinisher {
    pool: PgPool,
    telegram: Arc<TelegramClient>,
    destination: String,
    interval: Duration,
    batch_size: i64,
}

/// The delivery block: full text, source link, essence verdict.
fn delivery_text(post: &ScoredRawPost) -> String {
    format!(
        "{}\n\n{}\n\nScore: {:.1}\n{}",
        post.content, post.link, post.essence_score, post.essence_explanation
    )
}

impl RawFinisher {
    pub fn new(pool: PgPool, telegram: Arc<TelegramClient>, config: &Config) -> Self {
        Self {
            pool,
            telegram,
            destination: config.tg_destination.clone(),
            interval: Duration::from_secs(config.raw_finisher_interval_secs),
            batch_size: config.raw_finisher_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "raw finisher tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in raw::claim_scored(&self.pool, self.batch_size).await? {
            if !post.passed {
                raw::finish(&self.pool, post.id, RawState::Rejected).await?;
                continue;
            }

            let top_id = top::promote_from_raw(&self.pool, &post).await?;
            raw::finish(&self.pool, post.id, RawState::Promoted).await?;
            info!(post_id = post.id, top_id, "raw post promoted");

            // Fire-and-forget: delivery failure never rolls back a promotion.
            let telegram = Arc::clone(&self.telegram);
            let destination = self.destination.clone();
            let text = delivery_text(&post);
            let post_id = post.id;
            tokio::spawn(async move {
                if let Err(err) = telegram.send_message(&destination, &text).await {
                    warn!(post_id, %err, "delivery failed");
                }
            });
        }
        Ok(())
    }
}
