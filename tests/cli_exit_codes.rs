use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ddc_lib::DdcOutput;
use tempfile::TempDir;

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_assets")
        .join(name)
}

fn run_ddc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ddc"))
        .args(args)
        .output()
        .expect("run ddc")
}

fn compare_args<'a>(design: &'a str, implementation: &'a str) -> Vec<&'a str> {
    vec!["compare", "--design", design, "--impl", implementation, "--format", "json"]
}

#[test]
fn compare_exit_code_passes_for_matching_inputs() {
    let design = asset("design.json");
    let implementation = asset("implementation.json");
    let output = run_ddc(&compare_args(
        design.to_str().unwrap(),
        implementation.to_str().unwrap(),
    ));
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let parsed: DdcOutput = serde_json::from_slice(&output.stdout).expect("compare JSON");
    match parsed {
        DdcOutput::Compare(out) => {
            assert!(out.passed);
            assert_eq!(out.report.summary.total_components, 2);
            assert_eq!(out.report.summary.severity.high, 0);
        }
        other => panic!("expected compare output, got {other:?}"),
    }
}

#[test]
fn compare_exit_code_fails_on_high_severity_drift() {
    let design = asset("design.json");
    let implementation = asset("implementation_drift.json");
    let output = run_ddc(&compare_args(
        design.to_str().unwrap(),
        implementation.to_str().unwrap(),
    ));
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("compare JSON");
    assert_eq!(json["mode"], "compare");
    assert_eq!(json["passed"], false);
    let button = &json["comparisons"][0];
    assert_eq!(button["implementationSelector"], "button.submit");
    assert!(button["deviations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["property"] == "backgroundColor" && d["severity"] == "high"));
}

#[test]
fn fail_on_never_always_passes() {
    let design = asset("design.json");
    let implementation = asset("implementation_drift.json");
    let mut args = compare_args(design.to_str().unwrap(), implementation.to_str().unwrap());
    args.extend(["--fail-on", "never"]);
    let output = run_ddc(&args);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn yaml_design_input_is_accepted() {
    let design = asset("design.yaml");
    let implementation = asset("implementation.json");
    let output = run_ddc(&compare_args(
        design.to_str().unwrap(),
        implementation.to_str().unwrap(),
    ));
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_input_file_exits_with_error_payload() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.json");
    let implementation = asset("implementation.json");
    let output = run_ddc(&compare_args(
        missing.to_str().unwrap(),
        implementation.to_str().unwrap(),
    ));
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["mode"], "error");
    assert_eq!(json["error"]["category"], "io");
    assert!(json["error"]["remediation"].is_string());
}

#[test]
fn design_without_components_is_a_validation_error() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    std::fs::write(&design, r#"{"fileName":"Empty"}"#).expect("write design");
    let implementation = asset("implementation.json");

    let output = run_ddc(&compare_args(
        design.to_str().unwrap(),
        implementation.to_str().unwrap(),
    ));
    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["error"]["category"], "validation");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("validate"));
}

#[test]
fn invalid_config_exits_with_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let cfg_path = dir.path().join("ddc.toml");
    std::fs::write(&cfg_path, "[limits]\nchunk_size = 0\n").expect("write config");
    let design = asset("design.json");
    let implementation = asset("implementation.json");

    let mut args = compare_args(design.to_str().unwrap(), implementation.to_str().unwrap());
    args.extend(["--config", cfg_path.to_str().unwrap()]);
    let output = run_ddc(&args);
    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["error"]["category"], "config");
}

#[test]
fn output_flag_writes_report_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let out_path = dir.path().join("report.json");
    let design = asset("design.json");
    let implementation = asset("implementation.json");

    let mut args = compare_args(design.to_str().unwrap(), implementation.to_str().unwrap());
    args.extend(["--output", out_path.to_str().unwrap()]);
    let output = run_ddc(&args);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let written = std::fs::read(&out_path).expect("report written");
    let json: serde_json::Value = serde_json::from_slice(&written).expect("report JSON");
    assert_eq!(json["metadata"]["design"]["fileName"], "Checkout");
}

#[test]
fn unwritable_output_file_reports_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let out_path = dir.path().join("no-such-dir").join("report.json");
    let design = asset("design.json");
    let implementation = asset("implementation.json");

    let mut args = compare_args(design.to_str().unwrap(), implementation.to_str().unwrap());
    args.extend(["--output", out_path.to_str().unwrap()]);
    let output = run_ddc(&args);
    assert_eq!(output.status.code(), Some(2));

    // The error payload cannot go to the same path either, so it falls back to stdout.
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["mode"], "error");
    assert_eq!(json["error"]["category"], "io");
    assert!(json["error"]["message"].as_str().unwrap().contains("report.json"));
}

#[test]
fn snapshots_are_written_listed_and_pruned() {
    let dir = TempDir::new().expect("tempdir");
    let snaps = dir.path().join("snaps");
    let design = asset("design.json");
    let implementation = asset("implementation.json");

    for id in ["run-1", "run-2", "run-3"] {
        let mut args = compare_args(design.to_str().unwrap(), implementation.to_str().unwrap());
        args.extend(["--snapshot-dir", snaps.to_str().unwrap(), "--snapshot-id", id]);
        let output = run_ddc(&args);
        assert_eq!(output.status.code(), Some(0));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("compare JSON");
        assert_eq!(json["metadata"]["snapshotId"], id);
        // created_at must differ for a stable newest-first order
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    assert!(snaps.join("run-1.json").is_file());

    let listed = run_ddc(&["snapshots", "list", "--dir", snaps.to_str().unwrap()]);
    assert_eq!(listed.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&listed.stdout).expect("list JSON");
    assert_eq!(json["mode"], "snapshots");
    assert_eq!(json["records"][0]["id"], "run-3");
    assert_eq!(json["records"].as_array().unwrap().len(), 3);

    let pruned = run_ddc(&["snapshots", "prune", "--dir", snaps.to_str().unwrap(), "--keep", "1"]);
    assert_eq!(pruned.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&pruned.stdout).expect("prune JSON");
    assert_eq!(json["removed"], 2);
    assert_eq!(json["records"][0]["id"], "run-3");
    assert!(!snaps.join("run-1.json").exists());
}

#[test]
fn snapshots_list_without_directory_is_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_ddc"))
        .current_dir(dir.path())
        .args(["snapshots", "list"])
        .output()
        .expect("run ddc");
    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["error"]["category"], "config");
}
