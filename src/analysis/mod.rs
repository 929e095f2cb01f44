//! Analysis support
//!
//! Builds the analysis prompt and turns model output into a validated
//! [`AnalysisReport`](crate::results::AnalysisReport), whichever extraction
//! path the provider needs.

mod prompt;
pub mod recovery;
pub mod schema;

pub use prompt::build_prompt;
pub use schema::{response_schema, SchemaError};

use crate::error::ProviderFailure;
use crate::providers::OutputFormat;
use crate::results::AnalysisReport;
use tracing::debug;

/// Decode model text into a report.
///
/// `Strict` text must be a JSON document. `Embedded` text is searched for a
/// JSON object; when none exists the raw-output fallback report is
/// returned instead of an error.
pub fn decode_report(text: &str, format: OutputFormat) -> Result<AnalysisReport, ProviderFailure> {
    let value = match format {
        OutputFormat::Strict => recovery::parse_strict(text)?,
        OutputFormat::Embedded => match recovery::recover_object(text) {
            Some(value) => value,
            None => {
                debug!("No JSON object in model output, using fallback report");
                return Ok(AnalysisReport::raw_output_fallback());
            }
        },
    };

    Ok(schema::validate(&value)?)
}
