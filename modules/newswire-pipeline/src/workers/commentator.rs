//! Generates commentary candidates for top-top posts through the external
//! generation chain and records the winner. Runs on the dedicated
//! long-query pool: each candidate is four serial HTTP calls.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use newswire_common::{CommentaryCandidate, Config};
use sqlx::PgPool;
use tracing::{error, info};

use crate::stages::commentary::{
    select_best, total_score, CommentaryService, CANDIDATES_PER_ITEM,
};
use crate::store::top_top;

pub struct Commentator {
    pool: PgPool,
    service: Arc<dyn CommentaryService>,
    comment_weight: f32,
    news_weight: f32,
    interval: Duration,
    batch_size: i64,
}

/// Strictly serial candidate generation; the chain service is not safe to
/// hammer in parallel.
async fn generate_candidates(
    service: &dyn CommentaryService,
    text: &str,
) -> Vec<CommentaryCandidate> {
    let mut candidates = Vec::with_capacity(CANDIDATES_PER_ITEM);
    for _ in 0..CANDIDATES_PER_ITEM {
        candidates.push(service.candidate(text).await);
    }
    candidates
}

impl Commentator {
    pub fn new(pool: PgPool, service: Arc<dyn CommentaryService>, config: &Config) -> Self {
        Self {
            pool,
            service,
            comment_weight: config.comment_weight,
            news_weight: config.news_weight,
            interval: Duration::from_secs(config.commentator_interval_secs),
            batch_size: config.commentator_batch_size,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(%err, "commentator tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        for post in top_top::claim_pending(&self.pool, self.batch_size).await? {
            let candidates = generate_candidates(self.service.as_ref(), &post.content).await;
            let best = select_best(&candidates).clone();

            if !best.is_failed() {
                self.service.report_best_author(&best.author).await;
            }

            let total = total_score(
                best.score,
                post.final_score,
                self.comment_weight,
                self.news_weight,
            );
            top_top::store_commentary(&self.pool, post.id, &best, total).await?;

            info!(
                post_id = post.id,
                author = %best.author,
                comment_score = best.score,
                total_score = total,
                "commentary recorded"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommentaryService for CountingService {
        async fn candidate(&self, _: &str) -> CommentaryCandidate {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            CommentaryCandidate {
                author: format!("author-{n}"),
                text: "comment".into(),
                score: n as f32,
            }
        }

        async fn report_best_author(&self, _: &str) {}
    }

    #[tokio::test]
    async fn exactly_three_serial_candidates() {
        let service = CountingService { calls: AtomicUsize::new(0) };
        let candidates = generate_candidates(&service, "text").await;
        assert_eq!(candidates.len(), CANDIDATES_PER_ITEM);
        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
        assert_eq!(select_best(&candidates).author, "author-2");
    }
}
