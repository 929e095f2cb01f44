//! OpenRouter chat-completion provider (analysis only)

use super::traits::*;
use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::ProviderFailure;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const APP_TITLE: &str = "dorkscope";

/// OpenRouter, OpenAI-compatible chat completions
pub struct OpenRouter {
    base_url: String,
    model: String,
}

impl OpenRouter {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for OpenRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for OpenRouter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://openrouter.ai")
            .model(&self.model)
            .api_key_required(true)
    }

    fn supports_analysis(&self) -> bool {
        true
    }

    fn analysis_request(
        &self,
        prompt: &AnalysisPrompt,
        secret: &Secret,
    ) -> Result<ProviderRequest, ProviderFailure> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.instruction },
                { "role": "user", "content": prompt.body }
            ],
            "response_format": { "type": "json_object" }
        });

        Ok(ProviderRequest::post(endpoint(&self.base_url, "chat/completions")?)
            .header("Authorization", format!("Bearer {}", secret.expose()))
            .header("X-Title", APP_TITLE)
            .json(body))
    }

    fn analysis_response(&self, response: ProviderResponse) -> Result<String, ProviderFailure> {
        let parsed: ChatCompletion = response.json()?;

        // OpenRouter reports some upstream failures inside a 200 body.
        if let Some(error) = parsed.error {
            return Err(ProviderFailure::Status {
                status: error.code.unwrap_or(response.status),
                message: error.message.unwrap_or_default(),
            });
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| ProviderFailure::malformed("missing choices[0].message.content"))
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

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    code: Option<u16>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> AnalysisPrompt {
        AnalysisPrompt {
            instruction: "SYSTEM".to_string(),
            body: "USER".to_string(),
        }
    }

    #[test]
    fn test_request_shape() {
        let request = OpenRouter::new()
            .analysis_request(&prompt(), &Secret::new("sk-or-1"))
            .unwrap();

        assert_eq!(request.url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer sk-or-1")
        );
        let body = request.json_body().unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "SYSTEM");
        assert_eq!(body["messages"][1]["content"], "USER");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_envelope_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"summary\": \"ok\"}"}}]}"#;
        let text = OpenRouter::new()
            .analysis_response(ProviderResponse::new(200, body))
            .unwrap();
        assert_eq!(text, r#"{"summary": "ok"}"#);
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let err = OpenRouter::new()
            .analysis_response(ProviderResponse::new(200, r#"{"choices": []}"#))
            .unwrap_err();
        assert!(matches!(err, ProviderFailure::Malformed(_)));
    }

    #[test]
    fn test_error_in_success_body() {
        let body = r#"{"error": {"code": 429, "message": "Rate limit exceeded: free-models-per-day"}}"#;
        let err = OpenRouter::new()
            .analysis_response(ProviderResponse::new(200, body))
            .unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_cannot_search() {
        let provider = OpenRouter::new();
        assert!(!provider.supports_search());
        assert!(provider.search_request("q", &Secret::new("k")).is_err());
    }
}
