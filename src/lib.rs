//! Design Drift Checker (DDC) Library
//!
//! Reconciles a design-tool export (components with typed properties) with
//! the computed-style extract of a rendered page, and reports per-property
//! deviations, accessibility issues and regression risk.
//!
//! # Module Overview
//!
//! - [`normalize`] - CSS / design values into one comparable shape
//! - [`matcher`] - greedy design-to-implementation pairing
//! - [`comparators`] - per-property comparison with severity grading
//! - [`accessibility`] - contrast, alt text and accessible-name checks
//! - [`engine`] - sanitize, pair, compare in chunks, aggregate
//! - [`snapshot`] - persistence of finished runs
//! - [`report_builder`] - flat spacing/size/radius property reports
//! - [`config`] - Configuration file support
//! - [`types`] - Input and report data types
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use ddc_lib::{CompareOptions, ComparisonEngine, EngineConfig};
//! use serde_json::json;
//!
//! # async fn example() -> ddc_lib::Result<()> {
//! let engine = ComparisonEngine::new(EngineConfig::default())?;
//! let design = json!({ "components": [{ "id": "1", "name": "Button", "type": "FRAME" }] });
//! let implementation = json!({ "elements": [{ "selector": "button.primary", "tagName": "button" }] });
//!
//! let report = engine
//!     .compare_designs(design, implementation, &CompareOptions::default())
//!     .await?;
//! println!("{} deviations", report.summary.total_deviations);
//! # Ok(())
//! # }
//! ```

pub mod accessibility;
pub mod aggregate;
pub mod color;
pub mod comparators;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod report_builder;
pub mod sanitize;
pub mod severity;
pub mod similarity;
pub mod snapshot;
pub mod types;

pub use config::{Config, EngineConfig, Thresholds};
pub use engine::{compare_designs, CompareOptions, ComparisonEngine, ComponentOutcome, SnapshotOptions};
pub use error::{DdcError, ErrorCategory, ErrorPayload, Result, Stage};
pub use output::{
    CompareOutput, DdcOutput, ErrorOutput, SnapshotsOutput, DDC_OUTPUT_VERSION,
};
pub use report_builder::{
    build_comparison_report, ComparisonResultStatus, PropertyComparison, PropertyScope,
    ReportOptions,
};
pub use sanitize::SanitizeLimits;
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotRecord, SnapshotStore};
pub use types::{
    ComparisonRecord, ComparisonReport, ComparisonStatus, ComponentFailure, Deviation, Match,
    RegressionRisk, Severity, Summary,
};
