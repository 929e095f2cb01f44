//! Provider traits and types

use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::ProviderFailure;
use crate::results::SearchOutcome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// The enumerated set of providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Brave,
    OpenRouter,
    HuggingFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Gemini,
        ProviderKind::Brave,
        ProviderKind::OpenRouter,
        ProviderKind::HuggingFace,
    ];

    /// Selector value, also the credential key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Brave => "brave",
            Self::OpenRouter => "openrouter",
            Self::HuggingFace => "huggingface",
        }
    }

    pub fn all_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "brave" => Ok(Self::Brave),
            "openrouter" => Ok(Self::OpenRouter),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// HTTP request to be made on behalf of a provider
#[derive(Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// Request body
    pub data: Option<RequestBody>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: Vec::new(),
            data: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            params: Vec::new(),
            data: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.data {
            Some(RequestBody::Json(value)) => Some(value),
            None => None,
        }
    }
}

// Headers carry credentials, so only their names are shown.
impl std::fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(|k| k.as_str()).collect();
        header_names.sort_unstable();
        f.debug_struct("ProviderRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &header_names)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Build a response directly, mostly for tests
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
            url: String::new(),
        }
    }

    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderFailure> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort error message from a failed response body
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.text).ok()?;
        let candidates = [
            value.get("message"),
            value.pointer("/error/message"),
            value.pointer("/error/detail"),
            value.get("error"),
            value.get("detail"),
        ];
        let found = candidates
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        found
    }

    /// Turn a non-success response into a failure
    pub fn into_failure(self, fallback: &str) -> ProviderFailure {
        let message = self
            .error_message()
            .unwrap_or_else(|| fallback.to_string());
        ProviderFailure::Status {
            status: self.status,
            message,
        }
    }
}

/// How a provider's analysis text is turned into a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The text is expected to be a JSON document
    Strict,
    /// The JSON object is embedded somewhere in free-form text
    Embedded,
}

/// Prompt handed to an analysis provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    /// Opaque system instruction
    pub instruction: String,
    /// Target plus serialized results
    pub body: String,
}

/// Provider metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderAbout {
    /// Website URL
    pub website: Option<String>,
    /// Model identifier in use
    pub model: Option<String>,
    /// Whether an API key is required
    pub require_api_key: bool,
}

impl ProviderAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }
}

/// Shared capability interface implemented by every provider.
///
/// Building a request and parsing a response are pure; the dispatcher owns
/// the network call in between.
pub trait Provider: Send + Sync {
    /// Which enumerated provider this is
    fn kind(&self) -> ProviderKind;

    /// Display name, used in messages and as the result source label
    fn name(&self) -> &str;

    fn about(&self) -> ProviderAbout {
        ProviderAbout::default()
    }

    fn supports_search(&self) -> bool {
        false
    }

    fn supports_analysis(&self) -> bool {
        false
    }

    /// Key of the credential this provider needs
    fn credential_key(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Build the HTTP request for a search
    fn search_request(&self, _query: &str, _secret: &Secret) -> Result<ProviderRequest, ProviderFailure> {
        Err(ProviderFailure::Unsupported(format!(
            "{} does not support search",
            self.name()
        )))
    }

    /// Parse a successful search response into normalized results
    fn search_response(&self, _response: ProviderResponse) -> Result<SearchOutcome, ProviderFailure> {
        Err(ProviderFailure::Unsupported(format!(
            "{} does not support search",
            self.name()
        )))
    }

    /// Build the HTTP request for an analysis
    fn analysis_request(
        &self,
        _prompt: &AnalysisPrompt,
        _secret: &Secret,
    ) -> Result<ProviderRequest, ProviderFailure> {
        Err(ProviderFailure::Unsupported(format!(
            "{} does not support analysis",
            self.name()
        )))
    }

    /// Extract the model's text from a successful analysis response
    fn analysis_response(&self, _response: ProviderResponse) -> Result<String, ProviderFailure> {
        Err(ProviderFailure::Unsupported(format!(
            "{} does not support analysis",
            self.name()
        )))
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Strict
    }

    /// Apply configuration overrides (called once at load time)
    fn init(&mut self, _config: &ProviderConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Join a configured base URL and a path, tolerating a missing trailing slash
pub(crate) fn endpoint(base: &str, path: &str) -> Result<String, ProviderFailure> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Ok(url::Url::parse(&base)?.join(path.trim_start_matches('/'))?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
        }
        assert!("bing".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_request_debug_hides_header_values() {
        let request = ProviderRequest::get("https://api.test/search")
            .header("X-Subscription-Token", "super-secret");
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("X-Subscription-Token"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_error_message_shapes() {
        let r = ProviderResponse::new(401, r#"{"error": {"message": "No auth credentials found"}}"#);
        assert_eq!(r.error_message().as_deref(), Some("No auth credentials found"));

        let r = ProviderResponse::new(503, r#"{"error": "Model is currently loading"}"#);
        assert_eq!(r.error_message().as_deref(), Some("Model is currently loading"));

        let r = ProviderResponse::new(422, r#"{"error": {"detail": "Unable to validate request"}}"#);
        assert_eq!(r.error_message().as_deref(), Some("Unable to validate request"));

        let r = ProviderResponse::new(500, "<html>oops</html>");
        assert_eq!(r.error_message(), None);
    }

    #[test]
    fn test_into_failure_uses_fallback() {
        let failure = ProviderResponse::new(502, "").into_failure("Brave Search Request Failed");
        assert_eq!(
            failure,
            ProviderFailure::Status {
                status: 502,
                message: "Brave Search Request Failed".to_string()
            }
        );
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("https://openrouter.ai/api/v1", "chat/completions").unwrap(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:9000/", "/models/x").unwrap(),
            "http://127.0.0.1:9000/models/x"
        );
    }
}
