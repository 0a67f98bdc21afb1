//! Query pipeline
//!
//! Embed → nearest neighbours → threshold decision → formatted answer.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::QueryConfig;
use crate::embedding::VectorEngine;
use crate::error::Result;
use crate::index::Neighbor;
use crate::loader::KnowledgeBase;
use crate::web::{web_search, WebSearchProvider};

/// Answer text when the threshold passed but no label mapped to a pair
pub const NO_DATASET_ANSWER: &str = "No answer could be found in the dataset.";

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnswerSource {
    #[serde(rename = "KCC Dataset")]
    KccDataset,
    #[serde(rename = "Web Search")]
    WebSearch,
    #[serde(rename = "System (No Answer)")]
    NoAnswer,
}

impl AnswerSource {
    /// Label shown next to the answer
    pub fn label(&self) -> &'static str {
        match self {
            Self::KccDataset => "KCC Dataset",
            Self::WebSearch => "Web Search",
            Self::NoAnswer => "System (No Answer)",
        }
    }
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Answer plus its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub source: AnswerSource,
}

impl QueryResult {
    pub fn new(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }
}

/// Everything a query needs, loaded once and shared read-only
pub struct RagContext {
    engine: VectorEngine,
    knowledge: KnowledgeBase,
    web: Arc<dyn WebSearchProvider>,
}

impl RagContext {
    pub fn new(
        engine: VectorEngine,
        knowledge: KnowledgeBase,
        web: Arc<dyn WebSearchProvider>,
    ) -> Self {
        Self {
            engine,
            knowledge,
            web,
        }
    }

    /// Answer `query` from the dataset, or from the web when the closest
    /// match is farther than `config.distance_threshold`
    ///
    /// Only the best neighbour's distance is compared with the threshold.
    /// Neighbour labels outside the Q&A sequences are skipped. Embedding,
    /// search and provider errors propagate unchanged.
    pub fn answer_question(&self, query: &str, config: &QueryConfig) -> Result<QueryResult> {
        config.validate()?;

        let neighbors = self.retrieve(query, config.top_k)?;

        match neighbors.first() {
            Some(best) if best.distance <= config.distance_threshold => {
                log::debug!(
                    "Best match label {} at distance {:.4} within threshold {}",
                    best.label,
                    best.distance,
                    config.distance_threshold
                );
            }
            best => {
                log::debug!(
                    "Best distance {:?} exceeds threshold {}, falling back to web search",
                    best.map(|n| n.distance),
                    config.distance_threshold
                );
                let answer = self.web_search(query, config.max_web_results)?;
                return Ok(QueryResult::new(answer, AnswerSource::WebSearch));
            }
        }

        let blocks: Vec<String> = neighbors
            .iter()
            .filter_map(|n| self.knowledge.corpus().entry(n.label))
            .map(|pair| pair.to_markdown())
            .collect();

        if blocks.is_empty() {
            log::debug!("No neighbour label maps to a Q&A pair");
            return Ok(QueryResult::new(NO_DATASET_ANSWER, AnswerSource::NoAnswer));
        }

        Ok(QueryResult::new(blocks.join("\n\n"), AnswerSource::KccDataset))
    }

    /// Embed `query` and return its `top_k` nearest neighbours, closest first
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Neighbor>> {
        let embedding = self.engine.embed(query)?;
        self.knowledge.index().search(&embedding, top_k)
    }

    /// Run the web fallback directly
    pub fn web_search(&self, query: &str, max_results: usize) -> Result<String> {
        web_search(self.web.as_ref(), query, max_results)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn engine(&self) -> &VectorEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::QaCorpus;
    use crate::embedding::Embedder;
    use crate::error::RagError;
    use crate::index::VectorIndex;
    use crate::web::{WebResult, NO_WEB_RESULTS};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Returns the same neighbours for every query
    struct FixedIndex(Vec<Neighbor>);

    impl VectorIndex for FixedIndex {
        fn dimension(&self) -> usize {
            2
        }

        fn len(&self) -> usize {
            self.0.len()
        }

        fn search(&self, _query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
            Ok(self.0.iter().take(k).copied().collect())
        }
    }

    struct BrokenIndex;

    impl VectorIndex for BrokenIndex {
        fn dimension(&self) -> usize {
            2
        }

        fn len(&self) -> usize {
            0
        }

        fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<Neighbor>> {
            Err(RagError::search("index corrupted"))
        }
    }

    struct StubWeb {
        results: Vec<WebResult>,
        calls: AtomicUsize,
    }

    impl WebSearchProvider for StubWeb {
        fn search(&self, _query: &str, max_results: usize) -> Result<Vec<WebResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.iter().take(max_results).cloned().collect())
        }
    }

    fn corpus() -> QaCorpus {
        QaCorpus::new(
            vec![
                "What controls aphids in cotton?".into(),
                "When to sow wheat?".into(),
            ],
            vec!["Use neem oil spray.".into(), "November.".into()],
        )
    }

    fn context(index: Box<dyn VectorIndex>, web: Vec<WebResult>) -> (RagContext, Arc<StubWeb>) {
        let web = Arc::new(StubWeb {
            results: web,
            calls: AtomicUsize::new(0),
        });
        let ctx = RagContext::new(
            VectorEngine::new(Arc::new(StubEmbedder)),
            KnowledgeBase::new(index, corpus()),
            web.clone(),
        );
        (ctx, web)
    }

    #[test]
    fn test_answer_from_dataset() {
        let index = FixedIndex(vec![Neighbor::new(0, 0.2), Neighbor::new(1, 0.9)]);
        let (ctx, web) = context(Box::new(index), vec![]);

        let result = ctx.answer_question("aphids?", &QueryConfig::default()).unwrap();

        assert_eq!(result.source, AnswerSource::KccDataset);
        assert_eq!(
            result.answer,
            "**Q:** What controls aphids in cotton?\n**A:** Use neem oil spray.\n\n\
             **Q:** When to sow wheat?\n**A:** November."
        );
        assert_eq!(web.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_threshold_uses_best_distance_only() {
        // Second neighbour is far away but still included
        let index = FixedIndex(vec![Neighbor::new(1, 1.0), Neighbor::new(0, 3.5)]);
        let (ctx, _) = context(Box::new(index), vec![]);

        let result = ctx.answer_question("q", &QueryConfig::default()).unwrap();
        assert_eq!(result.source, AnswerSource::KccDataset);
        assert!(result.answer.starts_with("**Q:** When to sow wheat?"));
        assert!(result.answer.contains("neem"));
    }

    #[test]
    fn test_falls_back_to_web() {
        let index = FixedIndex(vec![Neighbor::new(0, 1.5)]);
        let (ctx, web) = context(Box::new(index), vec![WebResult::new("T1", "B1")]);

        let result = ctx.answer_question("q", &QueryConfig::default()).unwrap();
        assert_eq!(result, QueryResult::new("T1\nB1", AnswerSource::WebSearch));
        assert_eq!(web.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_index_falls_back_to_web() {
        let (ctx, _) = context(Box::new(FixedIndex(vec![])), vec![]);

        let result = ctx.answer_question("q", &QueryConfig::default()).unwrap();
        assert_eq!(result, QueryResult::new(NO_WEB_RESULTS, AnswerSource::WebSearch));
    }

    #[test]
    fn test_out_of_range_labels_skipped() {
        let index = FixedIndex(vec![
            Neighbor::new(7, 0.1),
            Neighbor::new(-1, 0.2),
            Neighbor::new(1, 0.3),
        ]);
        let (ctx, _) = context(Box::new(index), vec![]);

        let result = ctx.answer_question("q", &QueryConfig::default()).unwrap();
        assert_eq!(result.source, AnswerSource::KccDataset);
        assert_eq!(result.answer, "**Q:** When to sow wheat?\n**A:** November.");
    }

    #[test]
    fn test_no_valid_labels() {
        let index = FixedIndex(vec![Neighbor::new(7, 0.5)]);
        let (ctx, web) = context(Box::new(index), vec![WebResult::new("T", "B")]);

        let result = ctx.answer_question("q", &QueryConfig::default()).unwrap();
        assert_eq!(result, QueryResult::new(NO_DATASET_ANSWER, AnswerSource::NoAnswer));
        assert_eq!(web.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_top_k_limits_blocks() {
        let index = FixedIndex(vec![Neighbor::new(0, 0.1), Neighbor::new(1, 0.2)]);
        let (ctx, _) = context(Box::new(index), vec![]);

        let config = QueryConfig::default().with_top_k(1);
        let result = ctx.answer_question("q", &config).unwrap();
        assert!(!result.answer.contains("wheat"));
    }

    #[test]
    fn test_search_error_propagates() {
        let (ctx, _) = context(Box::new(BrokenIndex), vec![]);
        let err = ctx.answer_question("q", &QueryConfig::default()).unwrap_err();
        assert!(matches!(err, RagError::Search(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (ctx, _) = context(Box::new(FixedIndex(vec![])), vec![]);
        let err = ctx
            .answer_question("q", &QueryConfig::default().with_top_k(0))
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidConfig(_)));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(AnswerSource::KccDataset.to_string(), "KCC Dataset");
        assert_eq!(AnswerSource::WebSearch.to_string(), "Web Search");
        assert_eq!(AnswerSource::NoAnswer.to_string(), "System (No Answer)");
        assert_eq!(
            serde_json::to_string(&AnswerSource::NoAnswer).unwrap(),
            "\"System (No Answer)\""
        );
    }

    #[test]
    fn test_result_json_shape() {
        let result = QueryResult::new("T1\nB1", AnswerSource::WebSearch);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "answer": "T1\nB1", "source": "Web Search" })
        );
    }
}
