use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,
    /// Connection ceiling for the general pool shared by the short-query workers.
    pub pool_max_connections: u32,
    /// Connection ceiling for the dedicated pool used by the embedding and
    /// commentary workers, whose queries and upstream calls run long.
    pub slow_pool_max_connections: u32,

    // AI scoring provider (OpenAI-compatible)
    pub ai_api_key: String,
    pub ai_base_url: String,
    pub ai_model: String,

    // Embedding provider. No key means the encoder is unavailable and the
    // pipeline runs on fallback pseudo-embeddings from the start.
    pub embed_api_key: Option<String>,
    pub embed_base_url: String,
    pub embed_model: String,

    // Delivery
    pub tg_bot_token: String,
    pub tg_destination: String,

    // Commentary generation chain
    pub comment_author_url: String,
    pub comment_approach_url: String,
    pub comment_write_url: String,
    pub comment_assess_url: String,
    pub comment_roster_url: Option<String>,

    // Stage thresholds (>= comparisons)
    pub context_threshold: f32,
    pub essence_threshold: f32,
    pub essence_max_threshold: f32,
    pub final_threshold: f32,

    // total_score = comment_weight * best_comment + news_weight * final_score
    pub comment_weight: f32,
    pub news_weight: f32,

    // Novelty scoring
    pub similarity_metric: String,
    pub novelty_window: i64,

    // Worker cadence
    pub analyzer_interval_secs: u64,
    pub raw_finisher_interval_secs: u64,
    pub tagger_interval_secs: u64,
    pub embedder_interval_secs: u64,
    pub shortener_interval_secs: u64,
    pub finalizer_interval_secs: u64,
    pub commentator_interval_secs: u64,

    // Rows claimed per polling tick
    pub analyzer_batch_size: i64,
    pub raw_finisher_batch_size: i64,
    pub tagger_batch_size: i64,
    pub embedder_batch_size: i64,
    pub shortener_batch_size: i64,
    pub finalizer_batch_size: i64,
    pub commentator_batch_size: i64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            pool_max_connections: env_or("POOL_MAX_CONNECTIONS", 8),
            slow_pool_max_connections: env_or("SLOW_POOL_MAX_CONNECTIONS", 4),

            ai_api_key: required_env("AI_API_KEY"),
            ai_base_url: env_or_str("AI_BASE_URL", "https://api.deepseek.com/v1"),
            ai_model: env_or_str("AI_MODEL", "deepseek-chat"),

            embed_api_key: env::var("EMBED_API_KEY").ok(),
            embed_base_url: env_or_str("EMBED_BASE_URL", "https://api.openai.com/v1"),
            embed_model: env_or_str("EMBED_MODEL", "text-embedding-3-small"),

            tg_bot_token: required_env("TG_BOT_TOKEN"),
            tg_destination: required_env("TG_DESTINATION"),

            comment_author_url: required_env("COMMENT_AUTHOR_URL"),
            comment_approach_url: required_env("COMMENT_APPROACH_URL"),
            comment_write_url: required_env("COMMENT_WRITE_URL"),
            comment_assess_url: required_env("COMMENT_ASSESS_URL"),
            comment_roster_url: env::var("COMMENT_ROSTER_URL").ok(),

            context_threshold: env_or("CONTEXT_THRESHOLD", 6.0),
            essence_threshold: env_or("ESSENCE_THRESHOLD", 6.0),
            essence_max_threshold: env_or("ESSENCE_MAX_THRESHOLD", 8.0),
            final_threshold: env_or("FINAL_THRESHOLD", 6.0),

            comment_weight: env_or("COMMENT_WEIGHT", 0.7),
            news_weight: env_or("NEWS_WEIGHT", 0.3),

            similarity_metric: env_or_str("SIMILARITY_METRIC", "combined"),
            novelty_window: env_or("NOVELTY_WINDOW", 100),

            analyzer_interval_secs: env_or("ANALYZER_INTERVAL_SECS", 15),
            raw_finisher_interval_secs: env_or("RAW_FINISHER_INTERVAL_SECS", 10),
            tagger_interval_secs: env_or("TAGGER_INTERVAL_SECS", 15),
            embedder_interval_secs: env_or("EMBEDDER_INTERVAL_SECS", 30),
            shortener_interval_secs: env_or("SHORTENER_INTERVAL_SECS", 10),
            finalizer_interval_secs: env_or("FINALIZER_INTERVAL_SECS", 10),
            commentator_interval_secs: env_or("COMMENTATOR_INTERVAL_SECS", 10),

            analyzer_batch_size: env_or("ANALYZER_BATCH_SIZE", 5),
            raw_finisher_batch_size: env_or("RAW_FINISHER_BATCH_SIZE", 10),
            tagger_batch_size: env_or("TAGGER_BATCH_SIZE", 5),
            embedder_batch_size: env_or("EMBEDDER_BATCH_SIZE", 5),
            shortener_batch_size: env_or("SHORTENER_BATCH_SIZE", 5),
            finalizer_batch_size: env_or("FINALIZER_BATCH_SIZE", 10),
            commentator_batch_size: env_or("COMMENTATOR_BATCH_SIZE", 3),
        }
    }

    /// Log the config with secrets redacted.
    pub fn log_redacted(&self) {
        tracing::info!(
            ai_model = %self.ai_model,
            embed_model = %self.embed_model,
            embed_key_present = self.embed_api_key.is_some(),
            similarity_metric = %self.similarity_metric,
            context_threshold = self.context_threshold,
            essence_threshold = self.essence_threshold,
            final_threshold = self.final_threshold,
            novelty_window = self.novelty_window,
            "config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_or_str(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must parse as {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
