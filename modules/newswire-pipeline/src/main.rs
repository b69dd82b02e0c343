use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::AiClient;
use newswire_common::Config;
use telegram_client::TelegramClient;

use newswire_pipeline::embedding::{EmbeddingEngine, HttpEmbedder};
use newswire_pipeline::gateway::ScoringGateway;
use newswire_pipeline::novelty::SimilarityMetric;
use newswire_pipeline::stages::commentary::{ChainEndpoints, CommentaryChain};
use newswire_pipeline::store::migrate;
use newswire_pipeline::workers::{
    Analyzer, Commentator, Embedder, Finalizer, RawFinisher, Shortener, Tagger,
};

/// Default log filter: info for our crates, env overrides on top. Targets
/// are crate module paths, so the pipeline, scoring client, and delivery
/// client each need their own directive.
fn default_log_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("newswire_pipeline=info".parse()?)
        .add_directive("ai_client=info".parse()?)
        .add_directive("telegram_client=info".parse()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(default_log_filter()?).init();

    info!("Newswire pipeline starting...");

    let config = Config::from_env();
    config.log_redacted();

    // Two pools: short claim/update queries on one, the long-running
    // embedding and commentary work on the other, so a slow batch cannot
    // starve the rest of the pipeline.
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max_connections)
        .connect(&config.database_url)
        .await?;
    let slow_pool = PgPoolOptions::new()
        .max_connections(config.slow_pool_max_connections)
        .connect(&config.database_url)
        .await?;

    migrate::run(&pool).await?;

    let scorer = Arc::new(ScoringGateway::new(AiClient::new(
        &config.ai_api_key,
        &config.ai_base_url,
        &config.ai_model,
    )));

    let engine = match &config.embed_api_key {
        Some(key) => {
            let embed_client = AiClient::new(key, &config.embed_base_url, "")
                .with_embedding_model(&config.embed_model);
            Arc::new(EmbeddingEngine::new(Arc::new(HttpEmbedder::new(embed_client))))
        }
        None => Arc::new(EmbeddingEngine::without_encoder()),
    };

    let metric: SimilarityMetric = config
        .similarity_metric
        .parse()
        .map_err(anyhow::Error::msg)?;

    let telegram = Arc::new(TelegramClient::new(&config.tg_bot_token));
    let chain = Arc::new(CommentaryChain::new(ChainEndpoints::from_config(&config)));

    let workers = vec![
        tokio::spawn(Analyzer::new(pool.clone(), scorer.clone(), &config).run()),
        tokio::spawn(RawFinisher::new(pool.clone(), telegram, &config).run()),
        tokio::spawn(Tagger::new(pool.clone(), scorer.clone(), &config).run()),
        tokio::spawn(Embedder::new(slow_pool.clone(), engine, metric, &config).run()),
        tokio::spawn(Shortener::new(pool.clone(), scorer, &config).run()),
        tokio::spawn(Finalizer::new(pool, &config).run()),
        tokio::spawn(Commentator::new(slow_pool, chain, &config).run()),
    ];

    info!(workers = workers.len(), "all workers running");
    futures::future::join_all(workers).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_the_actual_crate_paths() {
        let filter = default_log_filter().unwrap().to_string();
        // Directives must name the real crate module paths or every
        // per-row event (and the degraded-embedding WARN) is dropped.
        assert!(filter.contains("newswire_pipeline=info"));
        assert!(filter.contains("ai_client=info"));
        assert!(filter.contains("telegram_client=info"));
    }
}
