//! Provider loader for initializing providers from configuration

use super::registry::ProviderRegistry;
use super::traits::{Provider, ProviderKind};
use super::{brave, gemini, huggingface, openrouter};
use crate::config::{ProviderConfig, ProvidersSettings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load every enabled provider
    pub fn load(settings: &ProvidersSettings) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for kind in ProviderKind::ALL {
            let config = settings.get(kind);
            if config.disabled {
                info!("Skipping disabled provider: {}", kind);
                continue;
            }

            match Self::create_provider(kind, config) {
                Ok(provider) => {
                    info!("Loaded provider: {}", provider.name());
                    match config.timeout {
                        Some(timeout) => registry.register_with_timeout(provider, timeout),
                        None => registry.register(provider),
                    }
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", kind, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    /// Create a provider instance by kind
    fn create_provider(kind: ProviderKind, config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
        let mut provider: Box<dyn Provider> = match kind {
            ProviderKind::Gemini => Box::new(gemini::Gemini::new()),
            ProviderKind::Brave => Box::new(brave::Brave::new()),
            ProviderKind::OpenRouter => Box::new(openrouter::OpenRouter::new()),
            ProviderKind::HuggingFace => Box::new(huggingface::HuggingFace::new()),
        };

        if let Some(ref base_url) = config.base_url {
            url::Url::parse(base_url)
                .map_err(|e| anyhow::anyhow!("invalid base_url {}: {}", base_url, e))?;
        }

        provider.init(config)?;

        Ok(Arc::from(provider))
    }
}
