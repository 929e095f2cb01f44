//! Dispatch outcome and request identity models

use crate::error::ClassifiedError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque, monotonically increasing identity of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens
#[derive(Debug, Default)]
pub struct TokenSource {
    next: AtomicU64,
}

impl TokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Outcome of one dispatch, tagged with the token issued for it
#[derive(Debug, Clone)]
pub struct Dispatched<T> {
    pub token: RequestToken,
    pub result: Result<T, ClassifiedError>,
}

impl<T> Dispatched<T> {
    pub fn new(token: RequestToken, result: Result<T, ClassifiedError>) -> Self {
        Self { token, result }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, ClassifiedError> {
        self.result
    }
}

/// Caller-side tracker of the most recent token issued.
///
/// A response whose token is older than the latest one recorded belongs to
/// a superseded request and should be discarded.
#[derive(Debug, Default)]
pub struct LatestToken {
    latest: AtomicU64,
}

impl LatestToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token; older tokens never move the marker backwards
    pub fn record(&self, token: RequestToken) {
        self.latest.fetch_max(token.0, Ordering::AcqRel);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}
