//! Gemini provider: grounded web search and schema-constrained analysis

use super::traits::*;
use crate::analysis::response_schema;
use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::ProviderFailure;
use crate::results::{NormalizedResult, SearchOutcome};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Title used when a grounding chunk has none
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
/// URL used when a grounding chunk has none
pub const MISSING_URL: &str = "#";
/// Grounding does not return snippets, so every result gets this one
pub const GROUNDING_SNIPPET: &str = "Source identified via Google Search grounding.";
const NO_SUMMARY: &str = "No summary available.";

/// Google Gemini with Google Search grounding
pub struct Gemini {
    base_url: String,
    model: String,
}

impl Gemini {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    fn generate_url(&self) -> Result<String, ProviderFailure> {
        endpoint(&self.base_url, &format!("models/{}:generateContent", self.model))
    }

    fn post(&self, secret: &Secret, body: serde_json::Value) -> Result<ProviderRequest, ProviderFailure> {
        Ok(ProviderRequest::post(self.generate_url()?)
            .header("x-goog-api-key", secret.expose())
            .header("Content-Type", "application/json")
            .json(body))
    }

    fn parse(&self, response: &ProviderResponse) -> Result<GenerateResponse, ProviderFailure> {
        let mut parsed: GenerateResponse = response.json()?;
        if let Some(error) = parsed.error.take() {
            return Err(ProviderFailure::Status {
                status: error.code.unwrap_or(response.status),
                message: error.message.unwrap_or_default(),
            });
        }
        Ok(parsed)
    }
}

impl Default for Gemini {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Gemini {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://ai.google.dev")
            .model(&self.model)
            .api_key_required(true)
    }

    fn supports_search(&self) -> bool {
        true
    }

    fn supports_analysis(&self) -> bool {
        true
    }

    fn search_request(&self, query: &str, secret: &Secret) -> Result<ProviderRequest, ProviderFailure> {
        let instruction = format!(
            "Execute the following dork-style search query and summarize the most relevant \
             findings for a security researcher: \"{}\"",
            query
        );
        self.post(
            secret,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": instruction }] }],
                "tools": [{ "google_search": {} }]
            }),
        )
    }

    fn search_response(&self, response: ProviderResponse) -> Result<SearchOutcome, ProviderFailure> {
        let parsed = self.parse(&response)?;
        let candidate = parsed.candidates.into_iter().next();

        let summary = candidate
            .as_ref()
            .map(Candidate::text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NO_SUMMARY.to_string());

        let results = candidate
            .and_then(|c| c.grounding_metadata)
            .map(|m| m.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .map(|chunk| {
                let web = chunk.web.unwrap_or_default();
                NormalizedResult::new(
                    non_empty(web.title).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
                    non_empty(web.uri).unwrap_or_else(|| MISSING_URL.to_string()),
                    GROUNDING_SNIPPET,
                    self.name(),
                )
            })
            .collect();

        Ok(SearchOutcome::new(summary, results))
    }

    fn analysis_request(
        &self,
        prompt: &AnalysisPrompt,
        secret: &Secret,
    ) -> Result<ProviderRequest, ProviderFailure> {
        self.post(
            secret,
            json!({
                "systemInstruction": { "parts": [{ "text": prompt.instruction }] },
                "contents": [{ "role": "user", "parts": [{ "text": prompt.body }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": response_schema()
                }
            }),
        )
    }

    fn analysis_response(&self, response: ProviderResponse) -> Result<String, ProviderFailure> {
        self.parse(&response)?
            .candidates
            .first()
            .map(Candidate::text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderFailure::malformed("response contained no candidate text"))
    }

    fn init(&mut self, config: &ProviderConfig) -> anyhow::Result<()> {
        if let Some(ref base_url) = config.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(ref model) = config.model {
            self.model = model.clone();
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

impl Candidate {
    fn text(&self) -> String {
        self.content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
struct WebSource {
    title: Option<String>,
    uri: Option<String>,
}
