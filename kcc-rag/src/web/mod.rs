//! Web search fallback
//!
//! Used when the dataset holds nothing close enough to the question.

mod duckduckgo;

pub use duckduckgo::{parse_results, DuckDuckGo, DuckDuckGoConfig};

use crate::error::Result;

/// Returned when the provider finds nothing
pub const NO_WEB_RESULTS: &str = "No relevant results found on the web.";

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResult {
    pub title: String,
    pub body: String,
    pub href: Option<String>,
}

impl WebResult {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// External web search provider
pub trait WebSearchProvider: Send + Sync {
    /// Up to `max_results` results for `query`, best first
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>>;
}

/// Search the web and format results as `title\nbody` blocks separated by blank lines
///
/// Provider errors propagate unchanged. With `max_results == 0` the provider
/// is not called.
pub fn web_search(
    provider: &dyn WebSearchProvider,
    query: &str,
    max_results: usize,
) -> Result<String> {
    if max_results == 0 {
        return Ok(NO_WEB_RESULTS.to_string());
    }

    let results = provider.search(query, max_results)?;
    log::debug!("Web search returned {} results", results.len());

    if results.is_empty() {
        return Ok(NO_WEB_RESULTS.to_string());
    }

    Ok(results
        .iter()
        .take(max_results)
        .map(|r| format!("{}\n{}", r.title, r.body))
        .collect::<Vec<_>>()
        .join("\n\n"))
}
