//! KCC Retrieval Layer
//!
//! Answers farming questions from the KCC question/answer corpus, falling back
//! to live web search when the corpus has nothing close enough.
//!
//! ## Features
//!
//! - **Semantic retrieval** - fastembed sentence embeddings + nearest-neighbour search
//! - **FAISS compatibility** - reads prebuilt flat L2 index files directly
//! - **Threshold fallback** - delegates to DuckDuckGo when the best match is too far
//! - **Explicit context** - resources are loaded once into an immutable [`RagContext`]
//!
//! ## Example
//!
//! ```ignore
//! use kcc_rag::{load_resources, LoaderOptions, QueryConfig, ResourcePaths};
//!
//! let paths = ResourcePaths::discover(None)?;
//! let ctx = load_resources(&paths, &LoaderOptions::default())?;
//!
//! let result = ctx.answer_question("How to control aphids in cotton?", &QueryConfig::default())?;
//! println!("{}\n\n[{}]", result.answer, result.source);
//! ```

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod shared;
pub mod web;

// Re-exports for convenience
pub use config::{QueryConfig, ResourcePaths, INDEX_FILE, TEXT_DATA_FILE};
pub use corpus::{QaCorpus, QaPair};
pub use embedding::{Embedder, FastEmbedder, VectorEngine};
pub use error::RagError;
pub use index::{FlatIndex, HnswIndex, IndexBackend, Neighbor, VectorIndex};
pub use loader::{load_resources, load_resources_with, KnowledgeBase, LoaderOptions};
pub use pipeline::{AnswerSource, QueryResult, RagContext, NO_DATASET_ANSWER};
pub use shared::SharedResources;
pub use web::{web_search, DuckDuckGo, DuckDuckGoConfig, WebResult, WebSearchProvider, NO_WEB_RESULTS};
