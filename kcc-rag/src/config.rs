//! Query parameters and resource file locations

use crate::error::{RagError, Result};
use std::path::{Path, PathBuf};

/// File name of the prebuilt FAISS index
pub const INDEX_FILE: &str = "faiss_index.index";
/// File name of the pickled question/answer sequences
pub const TEXT_DATA_FILE: &str = "text_data.pkl";

/// Per-query configuration
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Nearest neighbours to retrieve (default: 3)
    pub top_k: usize,
    /// Largest best-match distance still answered from the dataset (default: 1.0)
    pub distance_threshold: f32,
    /// Results requested from the web provider on fallback (default: 2)
    pub max_web_results: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            distance_threshold: 1.0,
            max_web_results: 2,
        }
    }
}

impl QueryConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold;
        self
    }

    pub fn with_max_web_results(mut self, max_results: usize) -> Self {
        self.max_web_results = max_results;
        self
    }

    /// Reject parameters the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::invalid_config("top_k must be at least 1"));
        }
        if !self.distance_threshold.is_finite() {
            return Err(RagError::invalid_config(format!(
                "distance_threshold must be finite, got {}",
                self.distance_threshold
            )));
        }
        Ok(())
    }
}

/// Locations of the persisted knowledge base files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub index: PathBuf,
    pub text_data: PathBuf,
}

impl ResourcePaths {
    /// Standard file names inside `base_dir`
    pub fn from_base_dir(base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref();
        Self {
            index: base.join(INDEX_FILE),
            text_data: base.join(TEXT_DATA_FILE),
        }
    }

    /// Find the data directory with priority:
    /// 1. Explicit directory (taken as-is, the loader reports missing files)
    /// 2. KCC_DATA_PATH environment variable
    /// 3. Directory of the running executable, then its parent
    /// 4. Current working directory
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::from_base_dir(dir));
        }

        if let Ok(data_path) = std::env::var("KCC_DATA_PATH") {
            let path = PathBuf::from(&data_path);
            if has_resource_files(&path) {
                log::info!("Using KCC_DATA_PATH: {}", path.display());
                return Ok(Self::from_base_dir(path));
            }
            log::warn!("KCC_DATA_PATH set but data files not found: {}", data_path);
        }

        for dir in candidate_dirs() {
            if has_resource_files(&dir) {
                log::info!("Using data directory: {}", dir.display());
                return Ok(Self::from_base_dir(dir));
            }
        }

        Err(RagError::resource(
            INDEX_FILE,
            format!(
                "KCC data files not found. Checked:\n\
                 - KCC_DATA_PATH environment variable\n\
                 - executable directory and its parent\n\
                 - current working directory\n\
                 \n\
                 Each location needs both {INDEX_FILE} and {TEXT_DATA_FILE}."
            ),
        ))
    }
}

/// True when `dir` holds both knowledge base files
pub fn has_resource_files(dir: &Path) -> bool {
    dir.join(INDEX_FILE).is_file() && dir.join(TEXT_DATA_FILE).is_file()
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        if let Some(parent) = exe_dir.parent() {
            dirs.push(exe_dir.clone());
            dirs.push(parent.to_path_buf());
        } else {
            dirs.push(exe_dir);
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_config_default() {
        let config = QueryConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.distance_threshold, 1.0);
        assert_eq!(config.max_web_results, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = QueryConfig::default().with_top_k(0);
        assert!(matches!(config.validate(), Err(RagError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = QueryConfig::default().with_distance_threshold(f32::NAN);
        assert!(matches!(config.validate(), Err(RagError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_base_dir() {
        let paths = ResourcePaths::from_base_dir("/srv/kcc");
        assert_eq!(paths.index, PathBuf::from("/srv/kcc/faiss_index.index"));
        assert_eq!(paths.text_data, PathBuf::from("/srv/kcc/text_data.pkl"));
    }

    #[test]
    fn test_discover_explicit_dir() {
        let paths = ResourcePaths::discover(Some(Path::new("/nonexistent/kcc"))).unwrap();
        assert!(paths.index.starts_with("/nonexistent/kcc"));
    }

    #[test]
    fn test_has_resource_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_resource_files(dir.path()));

        std::fs::write(dir.path().join(INDEX_FILE), b"").unwrap();
        assert!(!has_resource_files(dir.path()));

        std::fs::write(dir.path().join(TEXT_DATA_FILE), b"").unwrap();
        assert!(has_resource_files(dir.path()));
    }
}
