//! Comparison result types.
//!
//! These types represent the output of a comparison run:
//! - [`Deviation`] / [`Match`] - per-property outcomes
//! - [`ComparisonRecord`] - one per design node
//! - [`ComponentFailure`] - a comparison that could not complete
//! - [`Summary`] - aggregated counters
//! - [`ComparisonReport`] - the full result with metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity of a deviation. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// Release-risk triage bucket attached to some deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionRisk {
    Critical,
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    pub property: String,
    pub design_value: Value,
    pub implementation_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    pub severity: Severity,
    #[serde(default)]
    pub accessibility: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_risk: Option<RegressionRisk>,
    pub message: String,
}

impl Deviation {
    pub fn new(
        property: impl Into<String>,
        design_value: impl Into<Value>,
        implementation_value: impl Into<Value>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            design_value: design_value.into(),
            implementation_value: implementation_value.into(),
            difference: None,
            severity,
            accessibility: false,
            regression_risk: None,
            message: message.into(),
        }
    }

    pub fn with_difference(mut self, difference: f64) -> Self {
        self.difference = Some(difference);
        self
    }

    pub fn flag_accessibility(mut self) -> Self {
        self.accessibility = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub property: String,
    pub value: Value,
    pub message: String,
}

impl Match {
    pub fn new(
        property: impl Into<String>,
        value: impl Into<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a single property comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyOutcome {
    Deviation(Deviation),
    Match(Match),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    NoMatch,
    HasDeviations,
    Matches,
}

/// Per-factor similarity contributions of the chosen pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchedFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_compatibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub component_id: String,
    pub component_name: String,
    pub component_type: String,
    pub status: ComparisonStatus,
    #[serde(default)]
    pub deviations: Vec<Deviation>,
    #[serde(default)]
    pub matches: Vec<Match>,
    pub match_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_factors: Option<MatchedFactors>,
}

impl ComparisonRecord {
    /// Splits property outcomes and derives the status from them.
    pub fn from_outcomes(
        component_id: impl Into<String>,
        component_name: impl Into<String>,
        component_type: impl Into<String>,
        outcomes: Vec<PropertyOutcome>,
    ) -> Self {
        let mut deviations = Vec::new();
        let mut matches = Vec::new();
        for outcome in outcomes {
            match outcome {
                PropertyOutcome::Deviation(d) => deviations.push(d),
                PropertyOutcome::Match(m) => matches.push(m),
            }
        }
        let status = if deviations.is_empty() {
            ComparisonStatus::Matches
        } else {
            ComparisonStatus::HasDeviations
        };
        Self {
            component_id: component_id.into(),
            component_name: component_name.into(),
            component_type: component_type.into(),
            status,
            deviations,
            matches,
            match_score: 0.0,
            implementation_selector: None,
            matched_factors: None,
        }
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.deviations.iter().map(|d| d.severity).max()
    }
}

/// A component whose comparison did not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFailure {
    pub component_id: String,
    pub component_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskCounts {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityDetail {
    pub component_id: String,
    pub component_name: String,
    pub property: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySummary {
    pub issues: usize,
    pub impacted_components: usize,
    #[serde(default)]
    pub details: Vec<AccessibilityDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_components: usize,
    pub total_deviations: usize,
    pub total_matches: usize,
    pub failed_components: usize,
    pub severity: SeverityCounts,
    pub regression_risk: RiskCounts,
    pub accessibility: AccessibilitySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignSourceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<String>,
    pub node_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationSourceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<String>,
    pub node_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeCounts {
    pub design: usize,
    pub implementation: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub chunk_size: usize,
    pub chunks_processed: usize,
    pub nodes_processed: NodeCounts,
    pub original_counts: NodeCounts,
    pub accessibility_checks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub design: DesignSourceInfo,
    pub implementation: ImplementationSourceInfo,
    pub processing: ProcessingStats,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

/// Full result of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    pub comparisons: Vec<ComparisonRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ComponentFailure>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_status_follows_outcomes() {
        let clean = ComparisonRecord::from_outcomes(
            "1",
            "Card",
            "FRAME",
            vec![PropertyOutcome::Match(Match::new("width", 100.0, "ok"))],
        );
        assert_eq!(clean.status, ComparisonStatus::Matches);

        let drifted = ComparisonRecord::from_outcomes(
            "1",
            "Card",
            "FRAME",
            vec![PropertyOutcome::Deviation(Deviation::new(
                "width",
                100.0,
                140.0,
                Severity::High,
                "width differs",
            ))],
        );
        assert_eq!(drifted.status, ComparisonStatus::HasDeviations);
        assert_eq!(drifted.highest_severity(), Some(Severity::High));
    }

    #[test]
    fn deviation_serializes_camel_case() {
        let dev = Deviation::new("color", "#000", "#111", Severity::Low, "shift")
            .with_difference(1.5)
            .flag_accessibility();
        let json = serde_json::to_value(&dev).expect("serialize deviation");
        assert_eq!(json["designValue"], json!("#000"));
        assert_eq!(json["implementationValue"], json!("#111"));
        assert_eq!(json["severity"], json!("low"));
        assert_eq!(json["accessibility"], json!(true));
        assert!(json.get("regressionRisk").is_none());
    }

    #[test]
    fn status_uses_snake_case() {
        let json = serde_json::to_string(&ComparisonStatus::NoMatch).expect("serialize status");
        assert_eq!(json, "\"no_match\"");
    }
}
