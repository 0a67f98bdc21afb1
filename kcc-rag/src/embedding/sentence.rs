//! fastembed sentence embeddings
//!
//! ONNX sentence-transformer models run locally; vectors are L2-normalized.

use super::Embedder;
use crate::error::{RagError, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::Path;

/// Model the KCC index was built with
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// fastembed model wrapper
pub struct FastEmbedder {
    model: TextEmbedding,
    model_name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load a model by its sentence-transformers name
    ///
    /// Model files are downloaded into `cache_dir` on first use.
    pub fn new(model_name: &str, cache_dir: &Path) -> Result<Self> {
        let kind = parse_model_name(model_name)?;

        log::info!(
            "Loading embedding model {} (cache: {})",
            model_name,
            cache_dir.display()
        );

        let options = InitOptions::new(kind)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| RagError::resource(cache_dir, format!("failed to load {model_name}: {e}")))?;

        // Get dimension by encoding test string
        let probe = model
            .embed(vec!["test"], None)
            .map_err(|e| RagError::resource(cache_dir, format!("failed to encode test string: {e}")))?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(RagError::resource(
                cache_dir,
                format!("{model_name} produced an empty embedding"),
            ));
        }

        log::info!("Loaded {} ({}d)", model_name, dimension);

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self
            .model
            .embed(vec![text], None)
            .map_err(|e| RagError::embedding(format!("Failed to encode text: {}", e)))?;

        embeddings
            .pop()
            .ok_or_else(|| RagError::embedding("model returned no embedding"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Map a sentence-transformers model name onto a fastembed model
fn parse_model_name(name: &str) -> Result<EmbeddingModel> {
    let short = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .to_ascii_lowercase();

    match short.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "paraphrase-multilingual-minilm-l12-v2" => Ok(EmbeddingModel::ParaphraseMLMiniLML12V2),
        _ => Err(RagError::resource(
            name,
            "unsupported embedding model (expected all-MiniLM-L6-v2, all-MiniLM-L12-v2, \
             bge-small-en-v1.5, bge-base-en-v1.5 or paraphrase-multilingual-MiniLM-L12-v2)",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_model() {
        assert!(matches!(
            parse_model_name(DEFAULT_MODEL),
            Ok(EmbeddingModel::AllMiniLML6V2)
        ));
    }

    #[test]
    fn test_parse_model_with_org_prefix() {
        assert!(matches!(
            parse_model_name("sentence-transformers/all-MiniLM-L6-v2"),
            Ok(EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(matches!(
            parse_model_name("BAAI/bge-small-en-v1.5"),
            Ok(EmbeddingModel::BGESmallENV15)
        ));
    }

    #[test]
    fn test_parse_unknown_model() {
        let err = parse_model_name("word2vec").unwrap_err();
        assert!(err.is_resource_error());
    }
}
