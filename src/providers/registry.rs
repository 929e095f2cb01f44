//! Provider registry: selector to provider resolution

use super::traits::{Provider, ProviderKind};
use crate::error::ClassifiedError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of the enabled providers
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    timeouts: HashMap<ProviderKind, f64>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            timeouts: HashMap::new(),
        }
    }

    /// Register a provider, replacing any previous one of the same kind
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.kind(), provider);
    }

    /// Register a provider with a custom timeout in seconds
    pub fn register_with_timeout(&mut self, provider: Arc<dyn Provider>, timeout: f64) {
        self.timeouts.insert(provider.kind(), timeout);
        self.register(provider);
    }

    /// Get a provider by kind
    pub fn get(&self, kind: ProviderKind) -> Option<&Arc<dyn Provider>> {
        self.providers.get(&kind)
    }

    /// Resolve the provider that will serve a search
    pub fn resolve_search(&self, kind: ProviderKind) -> Result<Arc<dyn Provider>, ClassifiedError> {
        let provider = self.resolve(kind)?;
        if !provider.supports_search() {
            return Err(ClassifiedError::unsupported(
                provider.name(),
                "search is not supported by this provider",
            ));
        }
        Ok(provider)
    }

    /// Resolve the provider that will serve an analysis
    pub fn resolve_analysis(&self, kind: ProviderKind) -> Result<Arc<dyn Provider>, ClassifiedError> {
        let provider = self.resolve(kind)?;
        if !provider.supports_analysis() {
            return Err(ClassifiedError::unsupported(
                provider.name(),
                "analysis is not supported by this provider",
            ));
        }
        Ok(provider)
    }

    fn resolve(&self, kind: ProviderKind) -> Result<Arc<dyn Provider>, ClassifiedError> {
        self.providers.get(&kind).cloned().ok_or_else(|| {
            ClassifiedError::unsupported(kind.as_str(), "provider is not enabled")
        })
    }

    /// Custom timeout for a provider, in seconds
    pub fn get_timeout(&self, kind: ProviderKind) -> Option<f64> {
        self.timeouts.get(&kind).copied()
    }

    /// All registered providers, in selector order
    pub fn providers(&self) -> Vec<&Arc<dyn Provider>> {
        ProviderKind::ALL
            .iter()
            .filter_map(|kind| self.providers.get(kind))
            .collect()
    }

    /// Check if a provider is registered
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::{brave::Brave, gemini::Gemini, openrouter::OpenRouter};

    fn registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Gemini::new()));
        registry.register(Arc::new(Brave::new()));
        registry.register_with_timeout(Arc::new(OpenRouter::new()), 60.0);
        registry
    }

    #[test]
    fn test_registry() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains(ProviderKind::Brave));
        assert!(!registry.contains(ProviderKind::HuggingFace));
        assert_eq!(registry.get_timeout(ProviderKind::OpenRouter), Some(60.0));
        assert_eq!(registry.get_timeout(ProviderKind::Brave), None);
    }

    #[test]
    fn test_capabilities_resolve_separately() {
        let registry = registry();

        assert!(registry.resolve_search(ProviderKind::Brave).is_ok());
        let err = registry.resolve_analysis(ProviderKind::Brave).err().unwrap();
        assert_eq!(err.kind, ErrorKind::ProviderUnsupported);
        assert_eq!(err.provider_name, "Brave Search");

        assert!(registry.resolve_analysis(ProviderKind::OpenRouter).is_ok());
        let err = registry.resolve_search(ProviderKind::OpenRouter).err().unwrap();
        assert_eq!(err.kind, ErrorKind::ProviderUnsupported);

        assert!(registry.resolve_search(ProviderKind::Gemini).is_ok());
        assert!(registry.resolve_analysis(ProviderKind::Gemini).is_ok());
    }

    #[test]
    fn test_unregistered_provider() {
        let err = registry()
            .resolve_analysis(ProviderKind::HuggingFace)
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::ProviderUnsupported);
        assert_eq!(err.provider_name, "huggingface");
    }

    #[test]
    fn test_providers_in_selector_order() {
        let names: Vec<_> = registry().providers().iter().map(|p| p.kind()).collect();
        assert_eq!(
            names,
            vec![ProviderKind::Gemini, ProviderKind::Brave, ProviderKind::OpenRouter]
        );
    }
}
