//! Embedding generation
//!
//! This module provides an abstraction over embedding models with:
//! - A trait for different embedding backends
//! - An OpenAI-compatible HTTP backend (works for both OpenAI and Ollama)
//! - Batch processing for efficiency

mod http_backend;

pub use http_backend::*;

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;

/// One batch of embeddings plus the tokens the backend billed for it
#[derive(Debug, Clone, Default)]
pub struct EmbedBatch {
    pub embeddings: Vec<Vec<f32>>,
    pub tokens_used: u64,
}

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    async fn embed(&self, texts: Vec<String>) -> Result<EmbedBatch>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Create an embedder based on settings
pub fn create_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    let embedder = HttpEmbedder::new(settings)?;
    Ok(Box::new(embedder))
}

pub fn normalize_embedding(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|v| v / norm).collect()
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm or the
/// dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Helper to embed in batches
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<EmbedBatch> {
    let mut all = EmbedBatch {
        embeddings: Vec::with_capacity(texts.len()),
        tokens_used: 0,
    };

    for chunk in texts.chunks(batch_size.max(1)) {
        let batch = embedder.embed(chunk.to_vec()).await?;
        all.embeddings.extend(batch.embeddings);
        all.tokens_used += batch.tokens_used;
    }

    Ok(all)
}
