use crate::error::ErrorPayload;
use crate::snapshot::SnapshotRecord;
use crate::types::{ComparisonReport, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const DDC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DdcOutput {
    Compare(CompareOutput),
    Snapshots(SnapshotsOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub passed: bool,
    /// Lowest severity that fails the run; `None` never fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Severity>,
    #[serde(flatten)]
    pub report: ComparisonReport,
}

impl CompareOutput {
    pub fn from_report(report: ComparisonReport, fail_on: Option<Severity>) -> Self {
        Self {
            version: DDC_OUTPUT_VERSION.to_string(),
            passed: passes(&report, fail_on),
            fail_on,
            report,
        }
    }
}

/// A run passes when no deviation reaches `fail_on`. Failed components
/// always fail the run unless `fail_on` is `None`.
pub fn passes(report: &ComparisonReport, fail_on: Option<Severity>) -> bool {
    let Some(limit) = fail_on else {
        return true;
    };
    report.failures.is_empty()
        && report
            .comparisons
            .iter()
            .filter_map(|record| record.highest_severity())
            .all(|severity| severity < limit)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotsOutput {
    pub version: String,
    pub directory: PathBuf,
    #[serde(default)]
    pub records: Vec<SnapshotRecord>,
    /// Set by `snapshots prune`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
