use std::path::PathBuf;
use std::process::ExitCode;

use ddc_lib::output::DDC_OUTPUT_VERSION;
use ddc_lib::{DdcError, DdcOutput, FileSnapshotStore, SnapshotStore, SnapshotsOutput};
use tracing::info;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::resolve_snapshot_dir;
use crate::settings::load_config;

/// List stored snapshots, newest first.
pub fn run_snapshots_list(
    config_path: Option<PathBuf>,
    dir: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let store = match open_store(config_path, dir) {
        Ok((store, _)) => store,
        Err(err) => return render_error(err, format, None),
    };
    let records = match store.list_snapshots() {
        Ok(records) => records,
        Err(err) => return render_error(err, format, None),
    };

    let body = DdcOutput::Snapshots(SnapshotsOutput {
        version: DDC_OUTPUT_VERSION.to_string(),
        directory: store.dir().to_path_buf(),
        records,
        removed: None,
    });
    finish(&body, format)
}

/// Delete all but the newest `keep` snapshots.
pub fn run_snapshots_prune(
    config_path: Option<PathBuf>,
    dir: Option<PathBuf>,
    keep: Option<usize>,
    format: OutputFormat,
) -> ExitCode {
    let (store, max_records) = match open_store(config_path, dir) {
        Ok(opened) => opened,
        Err(err) => return render_error(err, format, None),
    };
    let keep = keep.unwrap_or(max_records);
    let removed = match store.prune_snapshots(keep) {
        Ok(removed) => removed,
        Err(err) => return render_error(err, format, None),
    };
    info!(removed, keep, dir = %store.dir().display(), "pruned snapshots");
    let records = match store.list_snapshots() {
        Ok(records) => records,
        Err(err) => return render_error(err, format, None),
    };

    let body = DdcOutput::Snapshots(SnapshotsOutput {
        version: DDC_OUTPUT_VERSION.to_string(),
        directory: store.dir().to_path_buf(),
        records,
        removed: Some(removed),
    });
    finish(&body, format)
}

fn open_store(
    config_path: Option<PathBuf>,
    dir: Option<PathBuf>,
) -> Result<(FileSnapshotStore, usize), DdcError> {
    let config = load_config(config_path.as_deref())?;
    let dir = resolve_snapshot_dir(dir, config.snapshots.directory.as_deref())?;
    Ok((FileSnapshotStore::new(dir), config.snapshots.max_records))
}

fn finish(body: &DdcOutput, format: OutputFormat) -> ExitCode {
    match write_output(body, format, None) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => render_error(err, format, None),
    }
}
