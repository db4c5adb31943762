// Text embedder trait: the swap-ready model dependency for clustering.
//
// The clusterer never loads a model itself. Callers construct one embedder
// up front (the local ONNX SentenceEmbedder in production, a deterministic
// fake in tests) and pass it by reference into every clustering call.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning texts into fixed-dimension vectors.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}
