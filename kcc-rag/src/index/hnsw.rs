//! HNSW graph over the loaded vectors
//!
//! Uses instant-distance for O(log n) approximate search. The graph is built
//! in memory from the flat table at startup; distances stay squared L2 so the
//! dataset threshold means the same thing under either backend.

use instant_distance::{Builder, HnswMap, Point, Search};

use super::{squared_l2, FlatIndex, Neighbor, VectorIndex};
use crate::error::{RagError, Result};

/// Fixed so two loads of the same file yield the same graph
const GRAPH_SEED: u64 = 0x4b43_4331;

/// HNSW point wrapper
#[derive(Clone)]
struct IndexPoint(Vec<f32>);

impl Point for IndexPoint {
    fn distance(&self, other: &Self) -> f32 {
        squared_l2(&self.0, &other.0)
    }
}

/// Approximate index; results beyond the graph's search width (100) are not returned
pub struct HnswIndex {
    hnsw: Option<HnswMap<IndexPoint, i64>>,
    dimension: usize,
    len: usize,
}

impl HnswIndex {
    /// Build the graph over every vector of `flat`
    pub fn build(flat: &FlatIndex) -> Self {
        let dimension = flat.dimension();
        let points: Vec<IndexPoint> = flat.vectors().map(|v| IndexPoint(v.to_vec())).collect();
        let len = points.len();

        if points.is_empty() {
            return Self {
                hnsw: None,
                dimension,
                len,
            };
        }

        log::info!("Building HNSW graph over {} vectors", len);

        let labels: Vec<i64> = (0..len as i64).collect();
        let hnsw = Builder::default()
            .ef_construction(100)
            .seed(GRAPH_SEED)
            .build(points, labels);

        Self {
            hnsw: Some(hnsw),
            dimension,
            len,
        }
    }
}

impl VectorIndex for HnswIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.len
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagError::search(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimension
            )));
        }

        let hnsw = match &self.hnsw {
            Some(hnsw) => hnsw,
            None => return Ok(Vec::new()),
        };

        let query_point = IndexPoint(query.to_vec());
        let mut search = Search::default();

        Ok(hnsw
            .search(&query_point, &mut search)
            .take(k)
            .map(|item| Neighbor::new(*item.value, item.distance))
            .collect())
    }
}
