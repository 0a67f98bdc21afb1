//! Vector embedding engine
//!
//! High-level API for generating and caching query embeddings.

use super::Embedder;
use crate::error::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Embeddings kept by [`VectorEngine::new`]
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Vector embedding engine with caching
///
/// Wraps any [`Embedder`] with a bounded LRU cache so repeated questions skip
/// the model while a long interactive session stays at a fixed footprint.
pub struct VectorEngine {
    model: Arc<dyn Embedder>,
    cache: Mutex<LruCache<String, Vec<f32>>>,
    dimension: usize,
}

impl VectorEngine {
    pub fn new(model: Arc<dyn Embedder>) -> Self {
        Self::with_capacity(model, DEFAULT_CACHE_CAPACITY)
    }

    /// Engine caching at most `capacity` embeddings (zero falls back to the default)
    pub fn with_capacity(model: Arc<dyn Embedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        let dimension = model.dimension();
        Self {
            model,
            cache: Mutex::new(LruCache::new(capacity)),
            dimension,
        }
    }

    /// Generate embedding with caching
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.lock().get(text) {
            return Ok(cached.clone());
        }

        // Model runs outside the lock
        let embedding = self.model.embed(text)?;
        self.cache.lock().put(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    /// Get embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get cache size
    pub fn cache_size(&self) -> usize {
        self.cache.lock().len()
    }

    /// Get cache capacity
    pub fn cache_capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}
