//! Search and analysis dispatch

use super::models::{Dispatched, RequestToken, TokenSource};
use crate::analysis::{build_prompt, decode_report};
use crate::credentials::{ProviderCredentials, Secret};
use crate::error::{classify, ClassifiedError, ProviderFailure};
use crate::network::HttpClient;
use crate::providers::{Provider, ProviderKind, ProviderRegistry, ProviderRequest, ProviderResponse};
use crate::results::{AnalysisReport, NormalizedResult, SearchOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Dispatcher for the two provider operations.
///
/// Each call resolves a provider, issues at most one request and returns one
/// result or one [`ClassifiedError`]. Nothing is retried and no credential is
/// kept between calls.
pub struct Dispatcher {
    /// HTTP client for making requests
    client: HttpClient,
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Opaque instruction attached to analysis requests
    instruction: String,
    tokens: TokenSource,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(client: HttpClient, registry: Arc<ProviderRegistry>, instruction: impl Into<String>) -> Self {
        Self {
            client,
            registry,
            instruction: instruction.into(),
            tokens: TokenSource::new(),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Reserve a token before dispatching, so the caller can mark it as
    /// the latest request while the call is still in flight
    pub fn issue_token(&self) -> RequestToken {
        self.tokens.issue()
    }

    /// Run `query` against the selected search provider
    pub async fn search(
        &self,
        query: &str,
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Dispatched<SearchOutcome> {
        self.search_with_token(self.issue_token(), query, selector, credentials)
            .await
    }

    /// Like [`search`](Self::search), under a token from [`issue_token`](Self::issue_token)
    pub async fn search_with_token(
        &self,
        token: RequestToken,
        query: &str,
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Dispatched<SearchOutcome> {
        let start = Instant::now();
        let result = self.run_search(query, selector, credentials).await;

        match result {
            Ok(ref outcome) => info!(
                "Search {} via {} returned {} results in {:?}",
                token,
                selector,
                outcome.results.len(),
                start.elapsed()
            ),
            Err(ref e) => warn!("Search {} via {} failed ({}): {}", token, selector, e.kind, e),
        }

        Dispatched::new(token, result)
    }

    /// Ask the selected analysis provider for a threat report on `results`
    pub async fn analyze(
        &self,
        target: &str,
        results: &[NormalizedResult],
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Dispatched<AnalysisReport> {
        self.analyze_with_token(self.issue_token(), target, results, selector, credentials)
            .await
    }

    pub async fn analyze_with_token(
        &self,
        token: RequestToken,
        target: &str,
        results: &[NormalizedResult],
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Dispatched<AnalysisReport> {
        let start = Instant::now();
        let result = self.run_analysis(target, results, selector, credentials).await;

        match result {
            Ok(ref report) => info!(
                "Analysis {} via {} produced {} threats in {:?}",
                token,
                selector,
                report.threats.len(),
                start.elapsed()
            ),
            Err(ref e) => warn!("Analysis {} via {} failed ({}): {}", token, selector, e.kind, e),
        }

        Dispatched::new(token, result)
    }

    async fn run_search(
        &self,
        query: &str,
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Result<SearchOutcome, ClassifiedError> {
        let provider = self.registry.resolve_search(selector)?;
        let secret = require_credential(provider.as_ref(), credentials)?;
        let secrets = credentials.secrets();
        let fail = |failure: ProviderFailure| classify(provider.name(), &failure, &secrets);

        debug!("Searching {} for query of {} chars", provider.name(), query.len());

        let request = provider.search_request(query, secret).map_err(&fail)?;
        let response = self.send(provider.as_ref(), request).await.map_err(&fail)?;
        provider.search_response(response).map_err(&fail)
    }

    async fn run_analysis(
        &self,
        target: &str,
        results: &[NormalizedResult],
        selector: ProviderKind,
        credentials: &ProviderCredentials,
    ) -> Result<AnalysisReport, ClassifiedError> {
        if results.is_empty() {
            debug!("No results to analyze for {}, skipping provider call", target);
            return Ok(AnalysisReport::no_data());
        }

        let provider = self.registry.resolve_analysis(selector)?;
        let secret = require_credential(provider.as_ref(), credentials)?;
        let secrets = credentials.secrets();
        let fail = |failure: ProviderFailure| classify(provider.name(), &failure, &secrets);

        let prompt = build_prompt(&self.instruction, target, results);
        debug!(
            "Analyzing {} results for {} with {}",
            results.len(),
            target,
            provider.name()
        );

        let request = provider.analysis_request(&prompt, secret).map_err(&fail)?;
        let response = self.send(provider.as_ref(), request).await.map_err(&fail)?;
        let text = provider.analysis_response(response).map_err(&fail)?;
        decode_report(&text, provider.output_format()).map_err(&fail)
    }

    /// Execute one request; non-success statuses become failures
    async fn send(
        &self,
        provider: &dyn Provider,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderFailure> {
        let response = match self.registry.get_timeout(provider.kind()) {
            Some(seconds) => {
                self.client
                    .execute_with_timeout(request, Duration::from_secs_f64(seconds))
                    .await?
            }
            None => self.client.execute(request).await?,
        };

        if !response.is_success() {
            debug!(
                "{} answered HTTP {} from {}",
                provider.name(),
                response.status,
                response.url
            );
            return Err(response.into_failure(&format!("{} Request Failed", provider.name())));
        }

        Ok(response)
    }
}

/// The provider's credential, or a ProviderUnsupported error naming it
fn require_credential<'a>(
    provider: &dyn Provider,
    credentials: &'a ProviderCredentials,
) -> Result<&'a Secret, ClassifiedError> {
    credentials.get(provider.credential_key()).ok_or_else(|| {
        ClassifiedError::unsupported(
            provider.name(),
            format!("missing `{}` credential", provider.credential_key()),
        )
    })
}
