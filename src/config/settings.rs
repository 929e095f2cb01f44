//! Settings structures for dorkscope configuration

use crate::providers::ProviderKind;
use crate::templates::{default_templates, QueryTemplate};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub providers: ProvidersSettings,
    pub analysis: AnalysisSettings,
    pub scan: ScanSettings,
    pub templates: Vec<QueryTemplate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: ProvidersSettings::default(),
            analysis: AnalysisSettings::default(),
            scan: ScanSettings::default(),
            templates: default_templates(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (DORKSCOPE_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DORKSCOPE_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DORKSCOPE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DORKSCOPE_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("DORKSCOPE_REQUEST_TIMEOUT") {
            if let Ok(timeout) = val.parse() {
                self.outgoing.request_timeout = timeout;
            }
        }
        if let Ok(val) = std::env::var("DORKSCOPE_MAX_RESULTS") {
            if let Ok(max) = val.parse() {
                self.scan.max_results = max;
            }
        }
        if let Ok(val) = std::env::var("DORKSCOPE_ANALYSIS_INSTRUCTION") {
            self.analysis.instruction = val;
        }
    }

    /// Get a template by name (case-insensitive)
    pub fn get_template(&self, name: &str) -> Option<&QueryTemplate> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "dorkscope".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 30.0,
            pool_maxsize: 8,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Whether the provider is disabled
    pub disabled: bool,
    /// Override of the provider's API base URL
    pub base_url: Option<String>,
    /// Override of the model identifier
    pub model: Option<String>,
    /// Custom timeout for this provider, in seconds
    pub timeout: Option<f64>,
}

/// Configuration for each enumerated provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub gemini: ProviderConfig,
    pub brave: ProviderConfig,
    pub openrouter: ProviderConfig,
    pub huggingface: ProviderConfig,
}

impl ProvidersSettings {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Brave => &self.brave,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::HuggingFace => &self.huggingface,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Brave => &mut self.brave,
            ProviderKind::OpenRouter => &mut self.openrouter,
            ProviderKind::HuggingFace => &mut self.huggingface,
        }
    }
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// System instruction attached to every analysis request
    pub instruction: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

const DEFAULT_INSTRUCTION: &str = "You are a reconnaissance assistant for security researchers. \
Analyze the supplied search results for the target and identify exposures. \
Score each threat from 0.0 to 10.0 following CVSS v3.1 bands \
(0.1-3.9 low, 4.0-6.9 medium, 7.0-8.9 high, 9.0-10.0 critical), \
summarize the digital footprint, and give actionable recommendations. \
Return only valid JSON.";

/// Caller-level scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Maximum number of results handed to analysis
    pub max_results: usize,
    /// Provider used for search when the selected one cannot search
    pub search_fallback: Option<ProviderKind>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            search_fallback: Some(ProviderKind::Brave),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8888);
        assert!(!settings.general.debug);
        assert_eq!(settings.scan.max_results, 10);
        assert_eq!(settings.scan.search_fallback, Some(ProviderKind::Brave));
        assert!(!settings.analysis.instruction.is_empty());
    }

    #[test]
    fn test_template_lookup() {
        let settings = Settings::default();
        let template = settings.get_template("admin panel discovery");
        assert!(template.is_some());
        assert!(template.unwrap().pattern.contains("{target}"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 9090
providers:
  openrouter:
    model: anthropic/claude-3-haiku
  huggingface:
    disabled: true
scan:
  max_results: 5
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(
            settings.providers.openrouter.model.as_deref(),
            Some("anthropic/claude-3-haiku")
        );
        assert!(settings.providers.get(ProviderKind::HuggingFace).disabled);
        assert_eq!(settings.scan.max_results, 5);
        assert_eq!(settings.scan.search_fallback, Some(ProviderKind::Brave));
        assert!(!settings.templates.is_empty());
    }
}
