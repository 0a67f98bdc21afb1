//! Error types for kcc-rag

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading resources or answering a query
#[derive(Debug, Error)]
pub enum RagError {
    /// A resource file was missing, unreadable or failed to deserialize
    #[error("Failed to load resource {}: {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },

    /// A query was attempted before resources finished loading
    #[error("Resources not loaded. Load resources before answering questions.")]
    Uninitialized,

    /// Query parameters out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index search error
    #[error("Search error: {0}")]
    Search(String),

    /// Web search provider error
    #[error("Web search error: {0}")]
    WebSearch(String),
}

impl RagError {
    /// Create a resource loading error for `path`
    pub fn resource(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Create a web search error
    pub fn web_search(msg: impl Into<String>) -> Self {
        Self::WebSearch(msg.into())
    }

    /// Whether the error came from startup loading
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::ResourceLoad { .. })
    }
}

/// Result type for kcc-rag operations
pub type Result<T> = std::result::Result<T, RagError>;
