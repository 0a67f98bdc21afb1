//! Model cache discovery
//!
//! Finds where fastembed should keep its downloaded model files.

use std::path::{Path, PathBuf};

const FALLBACK_CACHE_DIR: &str = ".fastembed_cache";

/// Find the embedding model cache directory with priority:
/// 1. KCC_MODELS_PATH environment variable
/// 2. Bundled location (`models/` next to the executable)
/// 3. User home directory (~/.kcc/models)
/// 4. `.fastembed_cache` in the working directory
///
/// The directory does not have to exist yet; fastembed downloads into it.
pub fn find_model_cache_dir() -> PathBuf {
    if let Ok(models_path) = std::env::var("KCC_MODELS_PATH") {
        log::info!("Using KCC_MODELS_PATH: {}", models_path);
        return PathBuf::from(models_path);
    }

    if let Some(bundled) = bundled_models_dir() {
        if bundled.is_dir() {
            log::info!("Using bundled models: {}", bundled.display());
            return bundled;
        }
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        return PathBuf::from(home).join(".kcc").join("models");
    }

    log::warn!(
        "No home directory found, caching models in ./{}",
        FALLBACK_CACHE_DIR
    );
    PathBuf::from(FALLBACK_CACHE_DIR)
}

fn bundled_models_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir: &Path| dir.join("models"))
}
