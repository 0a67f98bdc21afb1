//! One-time resource loading
//!
//! Reads the prebuilt index and the aligned Q&A sequences, instantiates the
//! embedding model, and hands back an immutable [`RagContext`].

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ResourcePaths;
use crate::corpus::QaCorpus;
use crate::embedding::{find_model_cache_dir, Embedder, FastEmbedder, VectorEngine, DEFAULT_MODEL};
use crate::error::{RagError, Result};
use crate::index::{open_index, IndexBackend, VectorIndex};
use crate::pipeline::RagContext;
use crate::web::{DuckDuckGo, DuckDuckGoConfig, WebSearchProvider};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// sentence-transformers model name (default: all-MiniLM-L6-v2)
    pub model_name: String,
    /// Where model files are cached; discovered when unset
    pub model_cache_dir: Option<PathBuf>,
    /// Search strategy over the loaded vectors
    pub backend: IndexBackend,
    /// Web fallback client settings
    pub web: DuckDuckGoConfig,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            model_cache_dir: None,
            backend: IndexBackend::Flat,
            web: DuckDuckGoConfig::default(),
        }
    }
}

/// Vector index plus the question/answer pairs its labels point at
///
/// Immutable once built. The index may hold more vectors than the corpus
/// has pairs; lookups are bounds-checked through [`QaCorpus::entry`].
pub struct KnowledgeBase {
    index: Box<dyn VectorIndex>,
    corpus: QaCorpus,
}

impl KnowledgeBase {
    pub fn new(index: Box<dyn VectorIndex>, corpus: QaCorpus) -> Self {
        if index.len() != corpus.len() {
            log::warn!(
                "Index holds {} vectors but text data has {} pairs; unmatched labels will be skipped",
                index.len(),
                corpus.len()
            );
        }
        Self { index, corpus }
    }

    /// Read both persisted files
    pub fn load(paths: &ResourcePaths, backend: IndexBackend) -> Result<Self> {
        let index = open_index(&paths.index, backend)?;
        let corpus = QaCorpus::load(&paths.text_data)?;
        Ok(Self::new(index, corpus))
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn corpus(&self) -> &QaCorpus {
        &self.corpus
    }
}

/// Load everything the query pipeline needs
///
/// Fails with [`RagError::ResourceLoad`] when a file is missing or corrupt or
/// the embedding model cannot be initialised. Not memoised; see
/// [`crate::SharedResources`] for a load-once boundary.
pub fn load_resources(paths: &ResourcePaths, options: &LoaderOptions) -> Result<RagContext> {
    log::info!(
        "Loading resources (index: {}, text data: {})",
        paths.index.display(),
        paths.text_data.display()
    );

    let knowledge = KnowledgeBase::load(paths, options.backend)?;

    let cache_dir = options
        .model_cache_dir
        .clone()
        .unwrap_or_else(find_model_cache_dir);
    let embedder = FastEmbedder::new(&options.model_name, &cache_dir)?;

    let web = DuckDuckGo::new(options.web.clone());

    assemble(paths, knowledge, Arc::new(embedder), Arc::new(web))
}

/// Load the persisted files with caller-supplied model and web provider
pub fn load_resources_with(
    paths: &ResourcePaths,
    backend: IndexBackend,
    embedder: Arc<dyn Embedder>,
    web: Arc<dyn WebSearchProvider>,
) -> Result<RagContext> {
    let knowledge = KnowledgeBase::load(paths, backend)?;
    assemble(paths, knowledge, embedder, web)
}

fn assemble(
    paths: &ResourcePaths,
    knowledge: KnowledgeBase,
    embedder: Arc<dyn Embedder>,
    web: Arc<dyn WebSearchProvider>,
) -> Result<RagContext> {
    let index_dim = knowledge.index().dimension();
    if embedder.dimension() != index_dim {
        return Err(RagError::resource(
            &paths.index,
            format!(
                "index stores {}d vectors but the embedding model produces {}d",
                index_dim,
                embedder.dimension()
            ),
        ));
    }

    log::info!(
        "Resources ready: {} vectors, {} Q&A pairs, {}d",
        knowledge.index().len(),
        knowledge.corpus().len(),
        index_dim
    );

    Ok(RagContext::new(VectorEngine::new(embedder), knowledge, web))
}
