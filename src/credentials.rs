//! Per-call provider credentials
//!
//! Credentials travel with each dispatch and are never stored by the crate.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// An opaque secret. Debug output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the raw value for building a request header
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([redacted])")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret)
    }
}

/// Mapping from provider name to secret
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProviderCredentials {
    keys: HashMap<String, Secret>,
}

impl ProviderCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl Into<String>, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    pub fn insert(&mut self, provider: impl Into<String>, secret: impl Into<String>) {
        self.keys.insert(provider.into(), Secret::new(secret));
    }

    /// Non-empty secret for a provider
    pub fn get(&self, provider: &str) -> Option<&Secret> {
        self.keys.get(provider).filter(|s| !s.is_empty())
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.get(provider).is_some()
    }

    /// All non-empty secret values, for scrubbing messages
    pub fn secrets(&self) -> Vec<&str> {
        self.keys
            .values()
            .filter(|s| !s.is_empty())
            .map(Secret::expose)
            .collect()
    }

    /// Fill gaps from `DORKSCOPE_<PROVIDER>_KEY` environment variables
    pub fn with_env_fallback(mut self, providers: &[&str]) -> Self {
        for provider in providers {
            if self.contains(provider) {
                continue;
            }
            let var = format!("DORKSCOPE_{}_KEY", provider.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                self.insert(*provider, value);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let creds = ProviderCredentials::new().with("brave", "BSA-secret");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("BSA-secret"));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let creds = ProviderCredentials::new().with("openrouter", "  ");
        assert!(!creds.contains("openrouter"));
        assert!(creds.secrets().is_empty());
    }

    #[test]
    fn test_deserialize_from_map() {
        let creds: ProviderCredentials =
            serde_json::from_str(r#"{"brave": "abc", "huggingface": ""}"#).unwrap();
        assert_eq!(creds.get("brave").map(Secret::expose), Some("abc"));
        assert!(!creds.contains("huggingface"));
    }

    #[test]
    fn test_env_fallback_does_not_override() {
        std::env::set_var("DORKSCOPE_GEMINI_KEY", "from-env");
        let creds = ProviderCredentials::new()
            .with("brave", "explicit")
            .with_env_fallback(&["gemini", "brave"]);
        assert_eq!(creds.get("gemini").map(Secret::expose), Some("from-env"));
        assert_eq!(creds.get("brave").map(Secret::expose), Some("explicit"));
        std::env::remove_var("DORKSCOPE_GEMINI_KEY");
    }
}
