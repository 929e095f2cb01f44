//! Scan flow: template substitution, search, then analysis

use super::executor::Dispatcher;
use super::models::RequestToken;
use crate::config::ScanSettings;
use crate::credentials::ProviderCredentials;
use crate::error::ClassifiedError;
use crate::providers::ProviderKind;
use crate::results::{AnalysisReport, NormalizedResult};
use crate::templates::QueryTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Input of one scan
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub target: String,
    /// Template name, looked up case-insensitively in the catalog
    #[serde(default)]
    pub template: Option<String>,
    /// Raw query, used when no template is named
    #[serde(default)]
    pub query: Option<String>,
    pub provider: ProviderKind,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Everything a scan produced
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Token shared by the search and analysis calls of this scan
    pub token: RequestToken,
    pub target: String,
    pub query: String,
    pub search_provider: String,
    /// `None` when no results reached analysis
    pub analysis_provider: Option<String>,
    pub summary: String,
    pub results: Vec<NormalizedResult>,
    pub report: AnalysisReport,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Provider(#[from] ClassifiedError),
}

/// Runs the search-then-analyze flow on top of a [`Dispatcher`]
pub struct Scanner {
    dispatcher: Arc<Dispatcher>,
    settings: ScanSettings,
    templates: Vec<QueryTemplate>,
}

impl Scanner {
    pub fn new(dispatcher: Arc<Dispatcher>, settings: ScanSettings, templates: Vec<QueryTemplate>) -> Self {
        Self {
            dispatcher,
            settings,
            templates,
        }
    }

    pub fn templates(&self) -> &[QueryTemplate] {
        &self.templates
    }

    /// Build the query for a request
    pub fn resolve_query(&self, request: &ScanRequest) -> Result<String, ScanError> {
        let target = request.target.trim();
        if target.is_empty() {
            return Err(ScanError::InvalidRequest("target is empty".to_string()));
        }

        if let Some(ref name) = request.template {
            let template = self
                .templates
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| ScanError::InvalidRequest(format!("unknown template: {}", name)))?;
            return Ok(template.render(target));
        }

        match request.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => Ok(query.to_string()),
            _ => Err(ScanError::InvalidRequest(
                "either a template or a query is required".to_string(),
            )),
        }
    }

    /// Provider that will serve the search for `selector`
    pub fn search_provider(&self, selector: ProviderKind) -> ProviderKind {
        let registry = self.dispatcher.registry();
        let can_search = registry
            .get(selector)
            .map(|p| p.supports_search())
            .unwrap_or(false);

        match self.settings.search_fallback {
            Some(fallback) if registry.contains(selector) && !can_search => {
                info!("{} cannot search, falling back to {}", selector, fallback);
                fallback
            }
            _ => selector,
        }
    }

    pub fn issue_token(&self) -> RequestToken {
        self.dispatcher.issue_token()
    }

    pub async fn scan(
        &self,
        request: &ScanRequest,
        credentials: &ProviderCredentials,
    ) -> Result<ScanOutcome, ScanError> {
        self.scan_with_token(self.issue_token(), request, credentials)
            .await
    }

    /// Run a scan under a token reserved with [`issue_token`](Self::issue_token)
    pub async fn scan_with_token(
        &self,
        token: RequestToken,
        request: &ScanRequest,
        credentials: &ProviderCredentials,
    ) -> Result<ScanOutcome, ScanError> {
        let started_at = Utc::now();
        let target = request.target.trim().to_string();
        let query = self.resolve_query(request)?;
        let search_kind = self.search_provider(request.provider);

        let mut outcome = self
            .dispatcher
            .search_with_token(token, &query, search_kind, credentials)
            .await
            .into_result()?;
        outcome.truncate(request.max_results.unwrap_or(self.settings.max_results));

        let (analysis_provider, report) = if outcome.is_empty() {
            info!("No results for {}, skipping analysis", target);
            (None, AnalysisReport::no_data())
        } else {
            let report = self
                .dispatcher
                .analyze_with_token(token, &target, &outcome.results, request.provider, credentials)
                .await
                .into_result()?;
            (Some(self.label(request.provider)), report)
        };

        Ok(ScanOutcome {
            token,
            target,
            query,
            search_provider: self.label(search_kind),
            analysis_provider,
            summary: outcome.summary,
            results: outcome.results,
            report,
            started_at,
            completed_at: Utc::now(),
        })
    }

    fn label(&self, kind: ProviderKind) -> String {
        self.dispatcher
            .registry()
            .get(kind)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| kind.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use crate::providers::ProviderLoader;
    use crate::config::ProvidersSettings;
    use crate::templates::default_templates;

    fn scanner() -> Scanner {
        let registry = ProviderLoader::load(&ProvidersSettings::default()).unwrap();
        let dispatcher = Dispatcher::new(HttpClient::new().unwrap(), Arc::new(registry), "i");
        Scanner::new(Arc::new(dispatcher), ScanSettings::default(), default_templates())
    }

    fn request(template: Option<&str>, query: Option<&str>) -> ScanRequest {
        ScanRequest {
            target: " example.com ".to_string(),
            template: template.map(String::from),
            query: query.map(String::from),
            provider: ProviderKind::OpenRouter,
            max_results: None,
        }
    }

    #[test]
    fn test_template_substitution() {
        let query = scanner()
            .resolve_query(&request(Some("admin panel discovery"), None))
            .unwrap();
        assert!(query.ends_with("site:example.com"));
        assert!(!query.contains("{target}"));
    }

    #[test]
    fn test_raw_query_and_invalid_requests() {
        let scanner = scanner();
        assert_eq!(
            scanner.resolve_query(&request(None, Some("inurl:login"))).unwrap(),
            "inurl:login"
        );
        assert!(matches!(
            scanner.resolve_query(&request(Some("Nope"), None)),
            Err(ScanError::InvalidRequest(_))
        ));
        assert!(matches!(
            scanner.resolve_query(&request(None, Some("  "))),
            Err(ScanError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_search_fallback() {
        let scanner = scanner();
        assert_eq!(scanner.search_provider(ProviderKind::OpenRouter), ProviderKind::Brave);
        assert_eq!(scanner.search_provider(ProviderKind::HuggingFace), ProviderKind::Brave);
        assert_eq!(scanner.search_provider(ProviderKind::Gemini), ProviderKind::Gemini);
    }
}
