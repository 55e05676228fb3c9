//! The comparison engine: sanitize, parse, pair, compare, aggregate.
//!
//! Pairing runs sequentially. Comparison of matched pairs runs in chunks:
//! each component of a chunk is compared on its own tokio task and the chunk
//! is joined before the next one starts, so at most `chunk_size` comparisons
//! are in flight. A task that fails becomes a [`ComponentFailure`] instead of
//! disappearing from the report.

use chrono::Utc;
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::accessibility::evaluate_accessibility;
use crate::aggregate::fold_summary;
use crate::comparators::compare_properties;
use crate::comparators::typography::rank_typography_candidates;
use crate::config::{Config, EngineConfig, Thresholds};
use crate::error::{DdcError, Result, Stage};
use crate::matcher::{pair_nodes, Subject};
use crate::normalize::{normalize_design, normalize_implementation, NormalizeOptions};
use crate::sanitize::{chunk, sanitize_value, value_kind};
use crate::severity::{regression_risk_for, risk_area, RiskArea};
use crate::snapshot::{SnapshotRecord, SnapshotStore, DEFAULT_MAX_RECORDS};
use crate::types::{
    ComparisonRecord, ComparisonReport, ComparisonStatus, ComponentFailure, DesignNode,
    DesignSourceInfo, DesignTree, Deviation, ImplementationNode, ImplementationSourceInfo,
    ImplementationTree, MatchedFactors, NodeCounts, NormalizedAttributes, ProcessingStats,
    ReportMetadata, Severity,
};


/// Outcome of comparing one design node.
pub type ComponentOutcome = std::result::Result<ComparisonRecord, ComponentFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub enabled: bool,
    /// Explicit snapshot id; a random one is generated when `None`.
    pub id: Option<String>,
    /// Store the sanitized inputs next to the report.
    pub include_inputs: bool,
    pub max_records: usize,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            id: None,
            include_inputs: false,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    pub chunk_size: usize,
    pub max_nodes: usize,
    pub accessibility_checks: bool,
    pub snapshot: SnapshotOptions,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions::from_config(&Config::default())
    }
}

impl CompareOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.limits.chunk_size,
            max_nodes: config.limits.max_nodes,
            accessibility_checks: config.accessibility.enabled,
            snapshot: SnapshotOptions {
                enabled: true,
                id: None,
                include_inputs: config.snapshots.include_inputs,
                max_records: config.snapshots.max_records,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DdcError::Config("chunk_size must be at least 1".into()));
        }
        if self.max_nodes == 0 {
            return Err(DdcError::Config("max_nodes must be at least 1".into()));
        }
        Ok(())
    }
}

/// Closest implementation typography for an unmatched text node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypographyHint {
    selector: String,
    score: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct PairedImplementation {
    node: ImplementationNode,
    attrs: NormalizedAttributes,
    score: f64,
    factors: MatchedFactors,
}

/// Everything one comparison task needs, owned.
#[derive(Debug, Clone)]
pub(crate) struct ComponentJob {
    design: DesignNode,
    design_attrs: NormalizedAttributes,
    pairing: Option<PairedImplementation>,
    typography_hint: Option<TypographyHint>,
}

pub struct ComparisonEngine {
    config: EngineConfig,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl std::fmt::Debug for ComparisonEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonEngine")
            .field("config", &self.config)
            .field("snapshot_store", &self.store.is_some())
            .finish()
    }
}

impl ComparisonEngine {
    /// Validates `config` once; the engine never changes it afterwards.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: None,
        })
    }

    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compare a design export with an implementation extract.
    ///
    /// Errors carry the failing stage and the JSON kind of both inputs.
    pub async fn compare_designs(
        &self,
        design: Value,
        implementation: Value,
        options: &CompareOptions,
    ) -> Result<ComparisonReport> {
        let design_kind = value_kind(&design);
        let implementation_kind = value_kind(&implementation);
        let at = |stage: Stage| move |err: DdcError| err.at_stage(stage, design_kind, implementation_kind);

        options.validate().map_err(at(Stage::Validate))?;

        let raw_design_count = raw_node_count(&design, &["components", "nodes"]);
        let raw_implementation_count = raw_node_count(&implementation, &["elements", "nodes"]);
        let design = sanitize_value(design, &self.config.sanitize);
        let implementation = sanitize_value(implementation, &self.config.sanitize);
        let inputs = options
            .snapshot
            .include_inputs
            .then(|| json!({ "design": design.clone(), "implementation": implementation.clone() }));

        let design: DesignTree = serde_json::from_value(design)
            .map_err(DdcError::from)
            .map_err(at(Stage::Parse))?;
        let implementation: ImplementationTree = serde_json::from_value(implementation)
            .map_err(DdcError::from)
            .map_err(at(Stage::Parse))?;

        let (design_nodes, implementation_nodes) =
            validate_inputs(&design, &implementation).map_err(at(Stage::Validate))?;
        // Sanitizing already truncates arrays, so the counts come from the raw input.
        let original_counts = NodeCounts {
            design: raw_design_count.unwrap_or(design_nodes.len()),
            implementation: raw_implementation_count.unwrap_or(implementation_nodes.len()),
        };
        let design_nodes = &design_nodes[..design_nodes.len().min(options.max_nodes)];
        let implementation_nodes =
            &implementation_nodes[..implementation_nodes.len().min(options.max_nodes)];
        if design_nodes.len() < original_counts.design
            || implementation_nodes.len() < original_counts.implementation
        {
            info!(
                max_nodes = options.max_nodes,
                design = original_counts.design,
                implementation = original_counts.implementation,
                "node count capped"
            );
        }

        info!(
            design = design_nodes.len(),
            implementation = implementation_nodes.len(),
            chunk_size = options.chunk_size,
            "starting comparison"
        );

        let jobs = self.prepare_jobs(design_nodes, implementation_nodes);
        let chunks_processed = jobs.len().div_ceil(options.chunk_size);

        let thresholds = self.config.thresholds;
        let accessibility = options.accessibility_checks;
        let (comparisons, failures) = run_chunked(&jobs, options.chunk_size, move |job| {
            Ok(compare_component(job, &thresholds, accessibility))
        })
        .await;

        let summary = fold_summary(&comparisons, &failures);
        info!(
            components = summary.total_components,
            deviations = summary.total_deviations,
            failed = summary.failed_components,
            "comparison finished"
        );

        let mut report = ComparisonReport {
            metadata: ReportMetadata {
                design: DesignSourceInfo {
                    file_key: design.file_key.clone(),
                    file_name: design.file_name.clone(),
                    page_id: design.page_id.clone(),
                    node_id: design.node_id.clone(),
                    extracted_at: design.extracted_at.clone(),
                    node_count: original_counts.design,
                },
                implementation: ImplementationSourceInfo {
                    url: implementation.url.clone(),
                    title: implementation.title.clone(),
                    extracted_at: implementation.extracted_at.clone(),
                    node_count: original_counts.implementation,
                },
                processing: ProcessingStats {
                    chunk_size: options.chunk_size,
                    chunks_processed,
                    nodes_processed: NodeCounts {
                        design: design_nodes.len(),
                        implementation: implementation_nodes.len(),
                    },
                    original_counts,
                    accessibility_checks: options.accessibility_checks,
                },
                generated_at: Utc::now(),
                snapshot_id: None,
            },
            comparisons,
            failures,
            summary,
        };

        self.persist_snapshot(&mut report, inputs, &options.snapshot);
        Ok(report)
    }

    fn prepare_jobs(
        &self,
        design_nodes: &[DesignNode],
        implementation_nodes: &[ImplementationNode],
    ) -> Vec<ComponentJob> {
        let normalize = NormalizeOptions::with_base_font_size(self.config.base_font_size);
        let design_attrs: Vec<NormalizedAttributes> = design_nodes
            .iter()
            .map(|n| normalize_design(n, &normalize))
            .collect();
        let implementation_attrs: Vec<NormalizedAttributes> = implementation_nodes
            .iter()
            .map(|n| normalize_implementation(n, &normalize))
            .collect();

        let design_subjects: Vec<_> = design_nodes
            .iter()
            .zip(&design_attrs)
            .map(|(n, a)| Subject::new(n, a))
            .collect();
        let implementation_subjects: Vec<_> = implementation_nodes
            .iter()
            .zip(&implementation_attrs)
            .map(|(n, a)| Subject::new(n, a))
            .collect();
        let pairings = pair_nodes(&design_subjects, &implementation_subjects, &self.config.matching);

        pairings
            .into_iter()
            .map(|outcome| {
                let design = &design_nodes[outcome.design_index];
                let attrs = &design_attrs[outcome.design_index];
                let pairing = outcome.candidate.map(|c| PairedImplementation {
                    node: implementation_nodes[c.implementation_index].clone(),
                    attrs: implementation_attrs[c.implementation_index].clone(),
                    score: c.score,
                    factors: c.factors,
                });
                let typography_hint = if pairing.is_none()
                    && design.node_type.eq_ignore_ascii_case("text")
                {
                    closest_typography(attrs, implementation_nodes, &implementation_attrs)
                } else {
                    None
                };
                ComponentJob {
                    design: design.clone(),
                    design_attrs: attrs.clone(),
                    pairing,
                    typography_hint,
                }
            })
            .collect()
    }

    fn persist_snapshot(
        &self,
        report: &mut ComparisonReport,
        inputs: Option<Value>,
        options: &SnapshotOptions,
    ) {
        let Some(store) = self.store.as_ref().filter(|_| options.enabled) else {
            return;
        };

        let record = SnapshotRecord::new(
            options.id.clone(),
            json!({
                "designFile": report.metadata.design.file_name,
                "implementationUrl": report.metadata.implementation.url,
                "totalComponents": report.summary.total_components,
                "totalDeviations": report.summary.total_deviations,
                "failedComponents": report.summary.failed_components,
            }),
        );
        report.metadata.snapshot_id = Some(record.id.clone());

        let saved = serde_json::to_value(&*report)
            .map_err(DdcError::from)
            .and_then(|report_value| {
                let mut payload = json!({ "report": report_value });
                if let Some(inputs) = inputs {
                    payload["inputs"] = inputs;
                }
                store.save_snapshot(&record, &payload)
            });
        if let Err(err) = saved {
            warn!(id = %record.id, error = %err, "failed to persist snapshot");
            report.metadata.snapshot_id = None;
            return;
        }

        match store.prune_snapshots(options.max_records) {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "pruned old snapshots"),
            Err(err) => warn!(error = %err, "failed to prune snapshots"),
        }
    }
}

/// Length of the first node array found under `keys`, before sanitizing.
fn raw_node_count(input: &Value, keys: &[&str]) -> Option<usize> {
    keys.iter()
        .find_map(|key| input.get(*key).and_then(Value::as_array))
        .map(Vec::len)
}

fn validate_inputs<'a>(
    design: &'a DesignTree,
    implementation: &'a ImplementationTree,
) -> Result<(&'a [DesignNode], &'a [ImplementationNode])> {
    let design_nodes = design
        .components
        .as_deref()
        .ok_or_else(|| DdcError::validation("design input is missing a `components` array"))?;
    let implementation_nodes = implementation
        .elements
        .as_deref()
        .ok_or_else(|| DdcError::validation("implementation input is missing an `elements` array"))?;
    if let Some(index) = design_nodes.iter().position(|n| n.id.trim().is_empty()) {
        return Err(DdcError::validation(format!(
            "design node at index {index} has an empty id"
        )));
    }
    Ok((design_nodes, implementation_nodes))
}

fn closest_typography(
    design: &NormalizedAttributes,
    implementation_nodes: &[ImplementationNode],
    implementation_attrs: &[NormalizedAttributes],
) -> Option<TypographyHint> {
    if design.typography.font_family.is_none() && design.typography.font_size.is_none() {
        return None;
    }
    let candidates = implementation_attrs
        .iter()
        .enumerate()
        .filter(|(i, _)| implementation_nodes[*i].visible_text().is_some())
        .map(|(i, attrs)| (i, &attrs.typography));
    let best = rank_typography_candidates(&design.typography, candidates)
        .into_iter()
        .next()
        .filter(|c| c.score > 0.0)?;
    Some(TypographyHint {
        selector: implementation_nodes[best.index].selector.clone(),
        score: best.score,
    })
}

/// Tag each deviation with its regression risk.
fn tag_regression_risk(deviations: &mut [Deviation]) {
    for deviation in deviations {
        deviation.regression_risk =
            regression_risk_for(risk_area(&deviation.property, deviation.accessibility), deviation.severity);
    }
}

fn existence_deviation(job: &ComponentJob) -> Deviation {
    let mut message = format!(
        "No implementation element matched design component '{}'",
        job.design.name
    );
    if let Some(hint) = &job.typography_hint {
        message.push_str(&format!(
            "; closest typography: {} (similarity {:.2})",
            hint.selector, hint.score
        ));
    }
    let mut deviation = Deviation::new(
        "existence",
        job.design.name.as_str(),
        Value::Null,
        Severity::High,
        message,
    );
    deviation.regression_risk = regression_risk_for(RiskArea::Existence, Severity::High);
    deviation
}

pub(crate) fn compare_component(
    job: ComponentJob,
    thresholds: &Thresholds,
    accessibility_checks: bool,
) -> ComparisonRecord {
    let Some(pairing) = &job.pairing else {
        return ComparisonRecord {
            component_id: job.design.id.clone(),
            component_name: job.design.name.clone(),
            component_type: job.design.node_type.clone(),
            status: ComparisonStatus::NoMatch,
            deviations: vec![existence_deviation(&job)],
            matches: Vec::new(),
            match_score: 0.0,
            implementation_selector: None,
            matched_factors: None,
        };
    };

    let mut outcomes = compare_properties(&job.design_attrs, &pairing.attrs, thresholds);
    if accessibility_checks {
        outcomes.extend(evaluate_accessibility(&pairing.node, &pairing.attrs));
    }

    let mut record = ComparisonRecord::from_outcomes(
        job.design.id.clone(),
        job.design.name.clone(),
        job.design.node_type.clone(),
        outcomes,
    );
    tag_regression_risk(&mut record.deviations);
    record.match_score = (pairing.score * 1000.0).round() / 1000.0;
    record.implementation_selector =
        Some(pairing.node.selector.clone()).filter(|s| !s.is_empty());
    record.matched_factors = Some(pairing.factors);
    record
}

/// Run `compare` over `jobs` chunk by chunk, one task per job.
///
/// Results keep job order. Failed or panicked tasks become failures.
pub(crate) async fn run_chunked<F>(
    jobs: &[ComponentJob],
    chunk_size: usize,
    compare: F,
) -> (Vec<ComparisonRecord>, Vec<ComponentFailure>)
where
    F: Fn(ComponentJob) -> ComponentOutcome + Clone + Send + 'static,
{
    let mut records = Vec::with_capacity(jobs.len());
    let mut failures = Vec::new();

    for (index, batch) in chunk(jobs, chunk_size).into_iter().enumerate() {
        debug!(chunk = index, size = batch.len(), "processing chunk");
        let tasks = batch.iter().map(|job| {
            let compare = compare.clone();
            let job = job.clone();
            tokio::spawn(async move { compare(job) })
        });
        let results = join_all(tasks).await;

        for (job, result) in batch.iter().zip(results) {
            let outcome = result.unwrap_or_else(|err| {
                Err(ComponentFailure {
                    component_id: job.design.id.clone(),
                    component_name: job.design.name.clone(),
                    reason: format!("comparison task failed: {err}"),
                })
            });
            match outcome {
                Ok(record) => records.push(record),
                Err(failure) => {
                    warn!(
                        component = %failure.component_id,
                        reason = %failure.reason,
                        "component comparison failed"
                    );
                    failures.push(failure);
                }
            }
        }
    }

    (records, failures)
}

/// Compare with the default configuration and no snapshot store.
pub async fn compare_designs(
    design: Value,
    implementation: Value,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    ComparisonEngine::new(EngineConfig::default())?
        .compare_designs(design, implementation, options)
        .await
}
