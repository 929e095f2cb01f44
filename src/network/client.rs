//! HTTP client for making requests to providers

use crate::config::OutgoingSettings;
use crate::error::ProviderFailure;
use crate::providers::{HttpMethod, ProviderRequest, ProviderResponse, RequestBody};
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper shared by every provider.
///
/// Holds no credentials: each request carries its own headers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: format!("dorkscope/{}", crate::VERSION),
        })
    }

    /// Execute a provider request
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderFailure> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a provider request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: ProviderRequest,
        timeout: Duration,
    ) -> Result<ProviderResponse, ProviderFailure> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("User-Agent", &self.user_agent);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        debug!("{:?} {}", request.method, request.url);

        let response = req_builder.send().await.map_err(transport_failure)?;

        Self::parse_response(response).await
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> Result<ProviderResponse, ProviderFailure> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let text = response.text().await.map_err(transport_failure)?;

        Ok(ProviderResponse {
            status,
            text,
            url,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Connection failures and timeouts mean the provider was unreachable
fn transport_failure(err: reqwest::Error) -> ProviderFailure {
    ProviderFailure::Transport {
        offline: err.is_connect() || err.is_timeout(),
        message: err.without_url().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
        assert!(client.unwrap().user_agent().starts_with("dorkscope/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_offline() {
        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::get("http://127.0.0.1:9/unreachable");
        let failure = client
            .execute_with_timeout(request, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(failure, ProviderFailure::Transport { offline: true, .. }));
    }
}
