use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ddc_lib::output::DDC_OUTPUT_VERSION;
use ddc_lib::{ComparisonStatus, DdcError, DdcOutput, ErrorOutput, Severity};

use crate::cli::OutputFormat;

/// Deviations listed per component in pretty output.
const MAX_PRETTY_DEVIATIONS: usize = 5;

/// Write output in the requested format.
pub fn write_output(
    body: &DdcOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), DdcError> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: DdcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DdcOutput::Error(ErrorOutput {
        version: DDC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; fail-on violations use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &DdcOutput, output: Option<&Path>) -> Result<(), DdcError> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        write_file(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &DdcOutput, output: Option<&Path>) -> Result<(), DdcError> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        write_file(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), DdcError> {
    std::fs::write(path, content).map_err(|e| {
        DdcError::Io(io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DdcOutput, colorize: bool) -> String {
    match body {
        DdcOutput::Compare(out) => {
            let mut buf = String::new();
            let report = &out.report;
            let summary = &report.summary;
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            let fail_on = out
                .fail_on
                .map(|s| s.to_string())
                .unwrap_or_else(|| "never".to_string());
            writeln!(buf, "{} Design drift check (fail on: {})", status_colored, fail_on).ok();
            writeln!(
                buf,
                "Components: {} ({} failed), deviations: {}, matches: {}",
                summary.total_components,
                summary.failed_components,
                summary.total_deviations,
                summary.total_matches
            )
            .ok();
            writeln!(
                buf,
                "Severity: {} high, {} medium, {} low",
                color(&summary.severity.high.to_string(), severity_color_code(Severity::High), colorize),
                color(&summary.severity.medium.to_string(), severity_color_code(Severity::Medium), colorize),
                summary.severity.low
            )
            .ok();
            writeln!(
                buf,
                "Regression risk: {} critical, {} major, {} minor",
                summary.regression_risk.critical,
                summary.regression_risk.major,
                summary.regression_risk.minor
            )
            .ok();
            if summary.accessibility.issues > 0 {
                writeln!(
                    buf,
                    "Accessibility: {} issues in {} components",
                    summary.accessibility.issues, summary.accessibility.impacted_components
                )
                .ok();
            }

            let drifted: Vec<_> = report
                .comparisons
                .iter()
                .filter(|r| r.status != ComparisonStatus::Matches)
                .collect();
            if !drifted.is_empty() {
                writeln!(buf, "Components with drift:").ok();
                for record in drifted {
                    let target = record
                        .implementation_selector
                        .as_deref()
                        .unwrap_or("no match");
                    writeln!(buf, "- {} [{}] -> {}", record.component_name, record.component_id, target).ok();
                    for deviation in record.deviations.iter().take(MAX_PRETTY_DEVIATIONS) {
                        let label = color(
                            &format!("{:6}", deviation.severity.to_string()),
                            severity_color_code(deviation.severity),
                            colorize,
                        );
                        writeln!(buf, "    {} {}", label, deviation.message).ok();
                    }
                    if record.deviations.len() > MAX_PRETTY_DEVIATIONS {
                        writeln!(
                            buf,
                            "    ... {} more",
                            record.deviations.len() - MAX_PRETTY_DEVIATIONS
                        )
                        .ok();
                    }
                }
            }

            if !report.failures.is_empty() {
                writeln!(buf, "Failed components:").ok();
                for failure in &report.failures {
                    writeln!(buf, "- {} [{}]: {}", failure.component_name, failure.component_id, failure.reason).ok();
                }
            }

            if let Some(id) = &report.metadata.snapshot_id {
                writeln!(buf, "Snapshot: {id}").ok();
            }
            buf
        }
        DdcOutput::Snapshots(out) => {
            let mut buf = String::new();
            let header = color("[SNAPSHOTS]", "36", colorize);
            writeln!(buf, "{} {}", header, out.directory.display()).ok();
            if let Some(removed) = out.removed {
                writeln!(buf, "Removed: {removed}").ok();
            }
            if out.records.is_empty() {
                writeln!(buf, "No snapshots").ok();
            }
            for record in &out.records {
                writeln!(buf, "- {}  {}", record.created_at.to_rfc3339(), record.id).ok();
            }
            buf
        }
        DdcOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map severity to ANSI color code.
fn severity_color_code(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "31",   // red
        Severity::Medium => "33", // yellow
        Severity::Low => "36",    // cyan
    }
}

/// Determine exit code for compare command.
pub fn exit_code_for_compare(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
