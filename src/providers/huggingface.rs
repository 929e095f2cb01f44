//! Hugging Face Inference API provider (analysis only)

use super::traits::*;
use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::ProviderFailure;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "meta-llama/Llama-3-8B-Instruct";
const MAX_NEW_TOKENS: u32 = 1024;

/// Raw text generation; the report is embedded in free-form output
pub struct HuggingFace {
    base_url: String,
    model: String,
}

impl HuggingFace {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    fn chat_template(prompt: &AnalysisPrompt) -> String {
        format!(
            "<|system|>\n{}\n<|user|>\n{}\n<|assistant|>",
            prompt.instruction, prompt.body
        )
    }
}

impl Default for HuggingFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for HuggingFace {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn name(&self) -> &str {
        "Hugging Face"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://huggingface.co")
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
            "inputs": Self::chat_template(prompt),
            "parameters": {
                "max_new_tokens": MAX_NEW_TOKENS,
                "return_full_text": false
            }
        });

        Ok(
            ProviderRequest::post(endpoint(&self.base_url, &format!("models/{}", self.model))?)
                .header("Authorization", format!("Bearer {}", secret.expose()))
                .json(body),
        )
    }

    fn analysis_response(&self, response: ProviderResponse) -> Result<String, ProviderFailure> {
        let parsed: Generation = response.json()?;
        let text = match parsed {
            Generation::Batch(items) => items.into_iter().next().and_then(|g| g.generated_text),
            Generation::Single(item) => item.generated_text,
        };
        text.ok_or_else(|| ProviderFailure::malformed("missing generated_text"))
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Embedded
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
#[serde(untagged)]
enum Generation {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}
