use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use ddc_lib::{CompareOutput, ComparisonEngine, DdcError, DdcOutput, EngineConfig};
use tracing::{debug, info};

use crate::cli::{FailOn, OutputFormat};
use crate::formatting::{exit_code_for_compare, render_error, write_output};
use crate::pipeline::{load_input, snapshot_store};
use crate::settings::{
    load_config, log_effective_config, resolve_compare_settings, CompareFlagSources,
};

/// Run the compare command.
#[allow(clippy::too_many_arguments)]
pub async fn run_compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    design: PathBuf,
    implementation: PathBuf,
    chunk_size: usize,
    max_nodes: usize,
    no_accessibility: bool,
    snapshot_dir: Option<PathBuf>,
    snapshot_id: Option<String>,
    fail_on: FailOn,
    timeout: Duration,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = CompareFlagSources::from_args(raw_args);
    let resolved = resolve_compare_settings(
        chunk_size,
        max_nodes,
        timeout,
        no_accessibility,
        snapshot_dir,
        snapshot_id,
        &config,
        &flag_sources,
    );
    if verbose {
        log_effective_config(config_path.as_deref(), &resolved);
    }

    let design_value = match load_input(&design) {
        Ok(value) => value,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let implementation_value = match load_input(&implementation) {
        Ok(value) => value,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let mut engine = match ComparisonEngine::new(EngineConfig::from(&config)) {
        Ok(engine) => engine,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if let Some(store) = snapshot_store(resolved.snapshot_dir.as_deref()) {
        engine = engine.with_snapshot_store(store);
    }

    let options = resolved.compare_options();
    debug!(?options, "compare options");
    let run = engine.compare_designs(design_value, implementation_value, &options);
    let report = match tokio::time::timeout(resolved.timeout, run).await {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => return render_error(err, format, output.clone()),
        Err(_) => return render_error(DdcError::Timeout(resolved.timeout), format, output.clone()),
    };

    let body = CompareOutput::from_report(report, fail_on.severity());
    let passed = body.passed;
    info!(
        passed,
        deviations = body.report.summary.total_deviations,
        "compare finished"
    );

    if let Err(err) = write_output(&DdcOutput::Compare(body), format, output.clone()) {
        return render_error(err, format, output);
    }

    exit_code_for_compare(passed)
}
