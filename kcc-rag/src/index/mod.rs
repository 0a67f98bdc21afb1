//! Vector index for nearest-neighbour retrieval
//!
//! The index is prebuilt offline and read from a FAISS flat file. Search is
//! exact by default; an in-memory HNSW graph can be layered over the same
//! vectors for large corpora.

mod faiss;
mod flat;
mod hnsw;

pub use faiss::{read_index, read_index_from};
pub use flat::FlatIndex;
pub use hnsw::HnswIndex;

use crate::error::Result;
use std::path::Path;

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the stored vector; negative when the index had no result
    pub label: i64,
    /// Squared L2 distance, lower is more similar
    pub distance: f32,
}

impl Neighbor {
    pub fn new(label: i64, distance: f32) -> Self {
        Self { label, distance }
    }
}

/// Nearest-neighbour search over fixed-dimensional vectors
pub trait VectorIndex: Send + Sync {
    /// Vector dimension accepted by [`VectorIndex::search`]
    fn dimension(&self) -> usize;

    /// Number of stored vectors
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` neighbours of `query`, closest first
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}

/// Search strategy used over the loaded vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexBackend {
    /// Exact brute-force search, identical to FAISS IndexFlatL2
    #[default]
    Flat,
    /// Approximate HNSW graph built in memory at startup
    Hnsw,
}

/// Read the index file at `path` and wrap it in the requested backend
pub fn open_index(path: &Path, backend: IndexBackend) -> Result<Box<dyn VectorIndex>> {
    let flat = read_index(path)?;
    match backend {
        IndexBackend::Flat => Ok(Box::new(flat)),
        IndexBackend::Hnsw => Ok(Box::new(HnswIndex::build(&flat))),
    }
}

/// Squared euclidean distance (FAISS L2 metric)
pub(crate) fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
