//! DuckDuckGo HTML search
//!
//! Posts the query to the JavaScript-free results page and scrapes titles and
//! snippets. Blocking; one request per call, no retries.

use std::collections::HashSet;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use super::{WebResult, WebSearchProvider};
use crate::error::{RagError, Result};

const HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html";
const USER_AGENT: &str = concat!("kcc-rag/", env!("CARGO_PKG_VERSION"));
/// Ad redirects; never organic results
const AD_REDIRECT: &str = "duckduckgo.com/y.js";

/// DuckDuckGo client settings
#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    /// Region code sent as `kl` (default: "wt-wt", no region)
    pub region: String,
    /// Whole-request timeout; none by default
    pub timeout: Option<Duration>,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            region: "wt-wt".to_string(),
            timeout: None,
        }
    }
}

/// DuckDuckGo web search provider
pub struct DuckDuckGo {
    agent: ureq::Agent,
    config: DuckDuckGoConfig,
}

impl DuckDuckGo {
    pub fn new(config: DuckDuckGoConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            config,
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new(DuckDuckGoConfig::default())
    }
}

impl WebSearchProvider for DuckDuckGo {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>> {
        log::debug!("DuckDuckGo search: {:?}", query);

        let response = self
            .agent
            .post(HTML_ENDPOINT)
            .send_form(&[("q", query), ("kl", self.config.region.as_str())])
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    RagError::web_search(format!("DuckDuckGo returned HTTP {}", code))
                }
                ureq::Error::Transport(t) => {
                    RagError::web_search(format!("DuckDuckGo request failed: {}", t))
                }
            })?;

        // 202 is how DuckDuckGo signals throttling
        if response.status() == 202 {
            return Err(RagError::web_search("DuckDuckGo rate limit (HTTP 202)"));
        }

        let body = response
            .into_string()
            .map_err(|e| RagError::web_search(format!("Failed to read DuckDuckGo response: {}", e)))?;

        parse_results(&body, max_results)
    }
}

/// Extract organic results from a DuckDuckGo HTML results page
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<WebResult>> {
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for node in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }
        if node.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(anchor) = node.select(&title_sel).next() else {
            continue;
        };
        let href = anchor.value().attr("href").unwrap_or_default().to_string();
        if href.contains(AD_REDIRECT) || !seen.insert(href.clone()) {
            continue;
        }

        let title = element_text(anchor);
        if title.is_empty() {
            continue;
        }
        let body = node
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut result = WebResult::new(title, body);
        if !href.is_empty() {
            result = result.with_href(href);
        }
        results.push(result);
    }

    Ok(results)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| RagError::web_search(format!("bad selector {css}: {e:?}")))
}

/// Text content with whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
