//! Provider dispatch
//!
//! Runs single-shot search and analysis calls against the selected provider
//! and turns every failure into a classified error.

mod executor;
mod models;
mod scan;

pub use executor::Dispatcher;
pub use models::*;
pub use scan::{ScanError, ScanOutcome, ScanRequest, Scanner};
