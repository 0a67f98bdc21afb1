//! Exact search over a contiguous vector table

use super::{squared_l2, Neighbor, VectorIndex};
use crate::error::{RagError, Result};

/// Flat L2 index: every stored vector is compared with the query
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    /// Row-major, `len * dimension` floats
    vectors: Vec<f32>,
}

impl FlatIndex {
    /// Build from row-major vectors
    ///
    /// `vectors.len()` must be a multiple of `dimension`.
    pub fn new(dimension: usize, vectors: Vec<f32>) -> Result<Self> {
        if dimension == 0 {
            return Err(RagError::search("index dimension must be positive"));
        }
        if vectors.len() % dimension != 0 {
            return Err(RagError::search(format!(
                "{} floats do not form whole {}d vectors",
                vectors.len(),
                dimension
            )));
        }
        Ok(Self { dimension, vectors })
    }

    /// Stored vector at `pos`
    pub fn vector(&self, pos: usize) -> Option<&[f32]> {
        let start = pos.checked_mul(self.dimension)?;
        self.vectors.get(start..start + self.dimension)
    }

    /// All stored vectors in label order
    pub fn vectors(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.chunks_exact(self.dimension)
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len() / self.dimension
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagError::search(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<Neighbor> = self
            .vectors()
            .enumerate()
            .map(|(pos, vector)| Neighbor::new(pos as i64, squared_l2(query, vector)))
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.label.cmp(&b.label))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatIndex {
        FlatIndex::new(2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 3.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let hits = index().search(&[0.9, 0.0], 3).unwrap();
        let labels: Vec<i64> = hits.iter().map(|h| h.label).collect();
        // Labels 1 and 3 tie; lower label first
        assert_eq!(labels, vec![1, 3, 0]);
        assert!((hits[0].distance - 0.01).abs() < 1e-6);
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let hits = index().search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let err = index().search(&[0.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, RagError::Search(_)));
    }

    #[test]
    fn test_empty_index() {
        let index = FlatIndex::new(3, vec![]).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[0.0; 3], 3).unwrap().is_empty());
    }

    #[test]
    fn test_new_rejects_ragged_vectors() {
        assert!(FlatIndex::new(3, vec![1.0, 2.0]).is_err());
        assert!(FlatIndex::new(0, vec![]).is_err());
    }

    #[test]
    fn test_vector_access() {
        let index = index();
        assert_eq!(index.vector(2), Some(&[0.0, 3.0][..]));
        assert_eq!(index.vector(4), None);
        assert_eq!(index.len(), 4);
    }
}
