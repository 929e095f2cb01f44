//! Result type definitions

use serde::{Deserialize, Serialize};

/// A single search hit, normalized across providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Title of the hit
    pub title: String,
    /// Link to the hit
    pub url: String,
    /// Content snippet
    pub snippet: String,
    /// Provider that produced the hit
    #[serde(rename = "source")]
    pub source_label: String,
}

impl NormalizedResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source_label: source_label.into(),
        }
    }

    /// Hostname of the hit, if the URL parses
    pub fn hostname(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}

/// Outcome of a search dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Narrative summary from the provider
    pub summary: String,
    /// Results in provider order
    pub results: Vec<NormalizedResult>,
}

impl SearchOutcome {
    pub fn new(summary: impl Into<String>, results: Vec<NormalizedResult>) -> Self {
        Self {
            summary: summary.into(),
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Keep at most `max` results, preserving order
    pub fn truncate(&mut self, max: usize) {
        self.results.truncate(max);
    }
}

/// Advisory severity band, CVSS-style
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// A threat identified by the analysis provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatFinding {
    pub description: String,
    /// Score in [0.0, 10.0]
    pub severity: f64,
}

impl ThreatFinding {
    pub fn band(&self) -> SeverityBand {
        SeverityBand::from_score(self.severity)
    }
}

/// Structured threat report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub threats: Vec<ThreatFinding>,
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    /// Report synthesized locally when a search produced nothing to analyze
    pub fn no_data() -> Self {
        Self {
            summary: "No public data nodes identified for this attack vector and target combination."
                .to_string(),
            threats: vec![],
            recommendations: vec![
                "Try a different attack vector or verify the target domain.".to_string(),
            ],
        }
    }

    /// Report used when model output contains no JSON object at all
    pub fn raw_output_fallback() -> Self {
        Self {
            summary: "Raw output received.".to_string(),
            threats: vec![],
            recommendations: vec![],
        }
    }

    /// Highest severity band among the threats
    pub fn highest_band(&self) -> Option<SeverityBand> {
        self.threats.iter().map(ThreatFinding::band).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bands() {
        assert_eq!(SeverityBand::from_score(0.0), SeverityBand::Low);
        assert_eq!(SeverityBand::from_score(3.9), SeverityBand::Low);
        assert_eq!(SeverityBand::from_score(4.0), SeverityBand::Medium);
        assert_eq!(SeverityBand::from_score(7.0), SeverityBand::High);
        assert_eq!(SeverityBand::from_score(8.9), SeverityBand::High);
        assert_eq!(SeverityBand::from_score(10.0), SeverityBand::Critical);
    }

    #[test]
    fn test_no_data_report() {
        let report = AnalysisReport::no_data();
        assert!(report.threats.is_empty());
        assert!(!report.recommendations.is_empty());
        assert_eq!(report.highest_band(), None);
    }

    #[test]
    fn test_truncate_preserves_order() {
        let mut outcome = SearchOutcome::new(
            "three",
            vec![
                NormalizedResult::new("a", "https://a.test", "", "Brave"),
                NormalizedResult::new("b", "https://b.test", "", "Brave"),
                NormalizedResult::new("c", "https://c.test", "", "Brave"),
            ],
        );
        outcome.truncate(2);
        let titles: Vec<_> = outcome.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_hostname() {
        let result = NormalizedResult::new("Admin", "https://example.com/admin", "", "Brave");
        assert_eq!(result.hostname().as_deref(), Some("example.com"));
        assert_eq!(NormalizedResult::new("x", "#", "", "Google").hostname(), None);
    }
}
