//! Load-once holder for serving shells
//!
//! [`RagContext`] already makes ordering a type-level matter. Shells that
//! keep resources in a long-lived slot and may receive queries before loading
//! succeeded use this cell instead; it reports [`RagError::Uninitialized`]
//! rather than panicking.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::QueryConfig;
use crate::error::{RagError, Result};
use crate::pipeline::{QueryResult, RagContext};

/// Process-wide slot for the loaded context
#[derive(Default)]
pub struct SharedResources {
    context: OnceLock<Arc<RagContext>>,
    loading: Mutex<()>,
}

impl SharedResources {
    pub fn new() -> Self {
        Self {
            context: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    /// Run `load` unless a context is already present
    ///
    /// Concurrent callers are serialised; only the first successful load is
    /// kept. A failed load leaves the slot empty so it can be retried.
    pub fn load_with<F>(&self, load: F) -> Result<Arc<RagContext>>
    where
        F: FnOnce() -> Result<RagContext>,
    {
        if let Some(ctx) = self.context.get() {
            return Ok(ctx.clone());
        }

        let _guard = self.loading.lock();
        if let Some(ctx) = self.context.get() {
            return Ok(ctx.clone());
        }

        let ctx = Arc::new(load()?);
        // Only this thread can set the slot while the guard is held
        let _ = self.context.set(ctx.clone());
        Ok(ctx)
    }

    /// Loaded context, or [`RagError::Uninitialized`]
    pub fn get(&self) -> Result<Arc<RagContext>> {
        self.context.get().cloned().ok_or(RagError::Uninitialized)
    }

    pub fn is_loaded(&self) -> bool {
        self.context.get().is_some()
    }

    /// Answer through the loaded context
    pub fn answer_question(&self, query: &str, config: &QueryConfig) -> Result<QueryResult> {
        self.get()?.answer_question(query, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::QaCorpus;
    use crate::embedding::{Embedder, VectorEngine};
    use crate::index::FlatIndex;
    use crate::loader::KnowledgeBase;
    use crate::pipeline::AnswerSource;
    use crate::web::{WebResult, WebSearchProvider};

    struct Origin;

    impl Embedder for Origin {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct NoWeb;

    impl WebSearchProvider for NoWeb {
        fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<WebResult>> {
            Ok(vec![])
        }
    }

    fn context() -> Result<RagContext> {
        let index = FlatIndex::new(2, vec![0.1, 0.0])?;
        let corpus = QaCorpus::new(vec!["q".into()], vec!["a".into()]);
        Ok(RagContext::new(
            VectorEngine::new(Arc::new(Origin)),
            KnowledgeBase::new(Box::new(index), corpus),
            Arc::new(NoWeb),
        ))
    }

    #[test]
    fn test_query_before_load_is_uninitialized() {
        let shared = SharedResources::new();
        assert!(!shared.is_loaded());

        let err = shared
            .answer_question("q", &QueryConfig::default())
            .unwrap_err();
        assert!(matches!(err, RagError::Uninitialized));
    }

    #[test]
    fn test_failed_load_stays_uninitialized() {
        let shared = SharedResources::new();
        let err = shared
            .load_with(|| Err(RagError::resource("faiss_index.index", "missing")))
            .err()
            .unwrap();
        assert!(err.is_resource_error());

        assert!(matches!(shared.get().err(), Some(RagError::Uninitialized)));
    }

    #[test]
    fn test_load_runs_once() {
        let shared = SharedResources::new();
        let mut calls = 0;

        assert!(shared
            .load_with(|| {
                calls += 1;
                context()
            })
            .is_ok());
        assert!(shared
            .load_with(|| {
                calls += 1;
                context()
            })
            .is_ok());

        assert_eq!(calls, 1);
        let result = shared
            .answer_question("q", &QueryConfig::default())
            .unwrap();
        assert_eq!(result.source, AnswerSource::KccDataset);
    }
}
