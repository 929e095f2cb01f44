//! Structural validation of model output

use crate::error::ProviderFailure;
use crate::results::{AnalysisReport, ThreatFinding};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub const MIN_SEVERITY: f64 = 0.0;
pub const MAX_SEVERITY: f64 = 10.0;

/// Why a payload is not a usable report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl From<SchemaError> for ProviderFailure {
    fn from(err: SchemaError) -> Self {
        ProviderFailure::Malformed(err.to_string())
    }
}

/// Validate a parsed payload and build the report.
///
/// `threats` may also arrive as `potentialThreats`. Severities are clamped
/// to [0, 10]; numeric strings are accepted, anything else is rejected.
pub fn validate(value: &Value) -> Result<AnalysisReport, SchemaError> {
    let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

    let summary = required(object, "summary")?
        .as_str()
        .ok_or_else(|| wrong_type("summary", "a string"))?
        .to_string();

    let threats = object
        .get("threats")
        .or_else(|| object.get("potentialThreats"))
        .ok_or(SchemaError::Missing("threats"))?
        .as_array()
        .ok_or_else(|| wrong_type("threats", "an array"))?
        .iter()
        .enumerate()
        .map(|(idx, item)| threat(idx, item))
        .collect::<Result<Vec<_>, _>>()?;

    let recommendations = required(object, "recommendations")?
        .as_array()
        .ok_or_else(|| wrong_type("recommendations", "an array"))?
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| wrong_type(&format!("recommendations[{}]", idx), "a string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisReport {
        summary,
        threats,
        recommendations,
    })
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaError> {
    object.get(field).ok_or(SchemaError::Missing(field))
}

fn wrong_type(field: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongType {
        field: field.to_string(),
        expected,
    }
}

fn threat(idx: usize, item: &Value) -> Result<ThreatFinding, SchemaError> {
    let field = |name: &str| format!("threats[{}].{}", idx, name);

    let object = item
        .as_object()
        .ok_or_else(|| wrong_type(&format!("threats[{}]", idx), "an object"))?;

    let description = object
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| wrong_type(&field("description"), "a string"))?
        .to_string();

    let severity = object
        .get("severity")
        .and_then(coerce_severity)
        .ok_or_else(|| wrong_type(&field("severity"), "a number"))?;

    Ok(ThreatFinding {
        description,
        severity: severity.clamp(MIN_SEVERITY, MAX_SEVERITY),
    })
}

fn coerce_severity(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Response schema sent to providers that support constrained output
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "threats": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": { "type": "STRING" },
                        "severity": { "type": "NUMBER" }
                    },
                    "required": ["description", "severity"]
                }
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["summary", "threats", "recommendations"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_report() {
        let value = json!({
            "summary": "Two exposures",
            "threats": [
                {"description": "Open admin panel", "severity": 8.1},
                {"description": "Directory listing", "severity": "5"}
            ],
            "recommendations": ["Restrict /admin", "Disable autoindex"]
        });
        let report = validate(&value).unwrap();
        assert_eq!(report.threats.len(), 2);
        assert_eq!(report.threats[1].severity, 5.0);
        assert_eq!(report.recommendations[0], "Restrict /admin");
    }

    #[test]
    fn test_missing_recommendations_is_rejected() {
        let value = json!({"summary": "s", "threats": []});
        assert_eq!(validate(&value), Err(SchemaError::Missing("recommendations")));
    }

    #[test]
    fn test_missing_summary_is_rejected() {
        let value = json!({"threats": [], "recommendations": []});
        assert_eq!(validate(&value), Err(SchemaError::Missing("summary")));
    }

    #[test]
    fn test_potential_threats_alias() {
        let value = json!({
            "summary": "s",
            "potentialThreats": [{"description": "Leaked .env", "severity": 9.8}],
            "recommendations": []
        });
        let report = validate(&value).unwrap();
        assert_eq!(report.threats[0].description, "Leaked .env");
    }

    #[test]
    fn test_severity_is_clamped() {
        let value = json!({
            "summary": "s",
            "threats": [
                {"description": "too high", "severity": 42},
                {"description": "negative", "severity": -3.5}
            ],
            "recommendations": []
        });
        let report = validate(&value).unwrap();
        assert_eq!(report.threats[0].severity, 10.0);
        assert_eq!(report.threats[1].severity, 0.0);
    }

    #[test]
    fn test_non_numeric_severity_is_rejected() {
        let value = json!({
            "summary": "s",
            "threats": [{"description": "x", "severity": "critical"}],
            "recommendations": []
        });
        assert!(matches!(
            validate(&value),
            Err(SchemaError::WrongType { ref field, .. }) if field == "threats[0].severity"
        ));
    }

    #[test]
    fn test_threat_without_description() {
        let value = json!({
            "summary": "s",
            "threats": [{"severity": 3}],
            "recommendations": []
        });
        assert!(validate(&value).is_err());
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(validate(&json!(["a"])), Err(SchemaError::NotAnObject));
    }

    #[test]
    fn test_schema_error_becomes_malformed() {
        let failure: ProviderFailure = SchemaError::Missing("summary").into();
        assert!(matches!(failure, ProviderFailure::Malformed(_)));
    }
}
