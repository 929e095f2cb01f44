//! Error classification for provider interactions
//!
//! Every failure that comes out of a provider call (transport error,
//! non-success status, or an unusable payload) is funnelled through
//! [`classify`] and leaves the crate as exactly one [`ClassifiedError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The small, uniform failure taxonomy exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    AuthInvalid,
    RateLimited,
    ProviderServerError,
    ProviderUnsupported,
    MalformedResponse,
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::AuthInvalid => write!(f, "auth_invalid"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ProviderServerError => write!(f, "provider_server_error"),
            Self::ProviderUnsupported => write!(f, "provider_unsupported"),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Terminal artifact of any failed provider interaction
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    #[serde(rename = "provider")]
    pub provider_name: String,
    pub message: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider_name: provider.into(),
            message: message.into(),
        }
    }

    /// Provider cannot serve the requested operation, or lacks its credential
    pub fn unsupported(provider: impl Into<String>, reason: impl AsRef<str>) -> Self {
        let provider = provider.into();
        let message = format!("{} Error: {}", provider, reason.as_ref());
        Self::new(ErrorKind::ProviderUnsupported, provider, message)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Network | ErrorKind::RateLimited | ErrorKind::ProviderServerError
        )
    }
}

/// Raw failure produced while talking to a provider, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The request never produced a response
    Transport { message: String, offline: bool },
    /// The provider answered with a non-success status
    Status { status: u16, message: String },
    /// A response arrived but its structure is unusable
    Malformed(String),
    /// The provider cannot serve this operation
    Unsupported(String),
    /// Anything else
    Other(String),
}

impl ProviderFailure {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Status { message, .. }
            | Self::Malformed(message)
            | Self::Unsupported(message)
            | Self::Other(message) => message,
        }
    }
}

impl From<serde_json::Error> for ProviderFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(format!("invalid JSON: {}", err))
    }
}

impl From<url::ParseError> for ProviderFailure {
    fn from(err: url::ParseError) -> Self {
        Self::Other(format!("invalid provider URL: {}", err))
    }
}

const AUTH_MARKERS: &[&str] = &[
    "401",
    "api_key_invalid",
    "invalid api key",
    "invalid_api_key",
    "unauthorized",
    "missing api key",
    "invalid credentials",
];

const RATE_LIMIT_MARKERS: &[&str] = &["429", "rate limit", "rate_limit", "too many requests", "quota"];

/// Map a raw failure to exactly one classified error.
///
/// First match wins: connectivity, credentials, rate limiting, server
/// status, payload structure, then everything else. `secrets` are scrubbed
/// from the resulting message.
pub fn classify(provider: &str, failure: &ProviderFailure, secrets: &[&str]) -> ClassifiedError {
    let status = failure.status();
    // Markers only apply to text the provider sent, never to our own parse errors.
    let lowered = match failure {
        ProviderFailure::Malformed(_) | ProviderFailure::Unsupported(_) => String::new(),
        other => other.message().to_lowercase(),
    };
    let has_marker = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    let (kind, message) = match failure {
        ProviderFailure::Unsupported(reason) => (
            ErrorKind::ProviderUnsupported,
            format!("{} Error: {}", provider, reason),
        ),
        ProviderFailure::Transport { offline: true, .. } => (
            ErrorKind::Network,
            format!(
                "{} Error: Network unreachable. Please check your internet connection.",
                provider
            ),
        ),
        _ if status == Some(401) || has_marker(AUTH_MARKERS) => (
            ErrorKind::AuthInvalid,
            format!("{} Error: Invalid API Key. Please check your settings.", provider),
        ),
        _ if status == Some(429) || has_marker(RATE_LIMIT_MARKERS) => (
            ErrorKind::RateLimited,
            format!("{} Error: Rate limit exceeded. Please wait a moment.", provider),
        ),
        _ if status.is_some_and(|s| s >= 500) => (
            ErrorKind::ProviderServerError,
            format!(
                "{} Error: Remote server error. The provider might be down.",
                provider
            ),
        ),
        ProviderFailure::Malformed(detail) => (
            ErrorKind::MalformedResponse,
            format!("{} Error: Malformed response: {}", provider, detail),
        ),
        other => {
            let message = if other.message().is_empty() {
                format!("An unexpected error occurred with {}.", provider)
            } else {
                other.message().to_string()
            };
            (ErrorKind::Unknown, message)
        }
    };

    ClassifiedError::new(kind, provider, redact(&message, secrets))
}

/// Replace every occurrence of a secret with a marker
pub fn redact(message: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(message.to_string(), |acc, secret| acc.replace(secret, "[redacted]"))
}
