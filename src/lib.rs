//! dorkscope: provider orchestration for search-driven reconnaissance
//!
//! Runs dork queries against interchangeable search providers, asks
//! interchangeable language-model providers for a structured threat report
//! on the results, and classifies every provider failure into one small,
//! uniform error taxonomy.

pub mod analysis;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod network;
pub mod providers;
pub mod results;
pub mod templates;
pub mod web;

pub use config::Settings;
pub use credentials::ProviderCredentials;
pub use dispatch::{Dispatcher, RequestToken, ScanOutcome, ScanRequest, Scanner};
pub use error::{ClassifiedError, ErrorKind};
pub use providers::{Provider, ProviderKind};
pub use results::{AnalysisReport, NormalizedResult, SearchOutcome, ThreatFinding};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
