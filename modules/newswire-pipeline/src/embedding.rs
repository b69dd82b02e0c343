//! Facet embedding with the zero-vector sentinel and a deterministic
//! fallback for encoder outages.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ai_client::AiClient;
use anyhow::Result;
use async_trait::async_trait;
use newswire_common::{TextEmbedder, EMBEDDING_DIM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Norms below this are treated as the zero-vector sentinel; real
/// embeddings of non-empty text never come out this small.
const ZERO_NORM_EPSILON: f32 = 1e-3;

/// The canonical "nothing to embed" sentinel.
pub fn zero_vector() -> Vec<f32> {
    vec![0.0; EMBEDDING_DIM]
}

pub fn is_zero_vector(v: &[f32]) -> bool {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    norm_sq.sqrt() < ZERO_NORM_EPSILON
}

/// Deterministic pseudo-embedding seeded from the text. Keeps the pipeline
/// moving through encoder outages, at the cost of the semantic
/// guarantee, which is why every use is counted and WARN-logged.
pub fn fallback_embedding(text: &str) -> Vec<f32> {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    (0..EMBEDDING_DIM).map(|_| rng.random_range(-0.1..0.1)).collect()
}

/// HTTP encoder over the embedding provider's API.
pub struct HttpEmbedder {
    client: AiClient,
}

impl HttpEmbedder {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.client.embed(text).await?)
    }
}

/// Produces one vector per facet: zero vector for absent/blank facets,
/// encoder output for real ones, seeded fallback when the encoder is
/// unavailable or errors.
pub struct EmbeddingEngine {
    encoder: Option<Arc<dyn TextEmbedder>>,
    fallback_uses: AtomicU64,
}

impl EmbeddingEngine {
    pub fn new(encoder: Arc<dyn TextEmbedder>) -> Self {
        Self { encoder: Some(encoder), fallback_uses: AtomicU64::new(0) }
    }

    /// No encoder configured at all: every non-empty facet gets a fallback
    /// pseudo-embedding. Similarity scores are not semantic in this mode.
    pub fn without_encoder() -> Self {
        warn!("no embedding encoder configured; running on fallback pseudo-embeddings");
        Self { encoder: None, fallback_uses: AtomicU64::new(0) }
    }

    pub async fn facet_vector(&self, facet: Option<&str>) -> Vec<f32> {
        let Some(text) = facet.map(str::trim).filter(|t| !t.is_empty()) else {
            return zero_vector();
        };

        if let Some(encoder) = &self.encoder {
            match encoder.embed(text).await {
                Ok(vector) if !vector.is_empty() => return vector,
                Ok(_) => warn!("encoder returned an empty vector, falling back"),
                Err(err) => warn!(%err, "encoder failed, falling back"),
            }
        }

        let uses = self.fallback_uses.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(total_fallback_uses = uses, "using seeded pseudo-embedding");
        fallback_embedding(text)
    }

    /// How many times the engine has degraded to pseudo-embeddings.
    pub fn fallback_uses(&self) -> u64 {
        self.fallback_uses.load(Ordering::Relaxed)
    }
}
