//! Embedding module for semantic retrieval
//!
//! Uses fastembed sentence embeddings (all-MiniLM-L6-v2 by default, 384d).

mod discovery;
mod engine;
mod sentence;

pub use discovery::find_model_cache_dir;
pub use engine::{VectorEngine, DEFAULT_CACHE_CAPACITY};
pub use sentence::{FastEmbedder, DEFAULT_MODEL};

use crate::error::Result;

/// Text to fixed-length vector
///
/// Implementations must be deterministic and safe to call concurrently.
pub trait Embedder: Send + Sync {
    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of every vector returned by [`Embedder::embed`]
    fn dimension(&self) -> usize;
}
