//! Brave Search API provider

use super::traits::*;
use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::ProviderFailure;
use crate::results::{NormalizedResult, SearchOutcome};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1";
const RESULT_COUNT: u32 = 10;

/// Brave web search, keyed by subscription token
pub struct Brave {
    base_url: String,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Brave {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Brave
    }

    fn name(&self) -> &str {
        "Brave Search"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://api.search.brave.com")
            .api_key_required(true)
    }

    fn supports_search(&self) -> bool {
        true
    }

    fn search_request(&self, query: &str, secret: &Secret) -> Result<ProviderRequest, ProviderFailure> {
        Ok(ProviderRequest::get(endpoint(&self.base_url, "web/search")?)
            .param("q", query)
            .param("count", RESULT_COUNT.to_string())
            .header("X-Subscription-Token", secret.expose())
            .header("Accept", "application/json"))
    }

    fn search_response(&self, response: ProviderResponse) -> Result<SearchOutcome, ProviderFailure> {
        let parsed: BraveResponse = response.json()?;

        // Snippets are trusted verbatim; absent fields stay empty.
        let results: Vec<NormalizedResult> = parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                NormalizedResult::new(
                    item.title.unwrap_or_default(),
                    item.url.unwrap_or_default(),
                    item.description.unwrap_or_default(),
                    self.name(),
                )
            })
            .collect();

        let summary = format!("Retrieved {} nodes from Brave Search index.", results.len());
        Ok(SearchOutcome::new(summary, results))
    }

    fn init(&mut self, config: &ProviderConfig) -> anyhow::Result<()> {
        if let Some(ref base_url) = config.base_url {
            self.base_url = base_url.clone();
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveItem>,
}

#[derive(Debug, Deserialize)]
struct BraveItem {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
}
