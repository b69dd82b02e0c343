use anyhow::Result;
use async_trait::async_trait;

/// Strategy boundary for the embedding provider. The novelty scorer only
/// sees vectors; the encoder behind this trait is swappable (HTTP encoder,
/// deterministic fallback, test stub) without touching similarity logic.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
