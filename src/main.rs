mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use cli::{Commands, SnapshotAction};
use commands::{run_compare, run_snapshots_list, run_snapshots_prune};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Compare {
            design,
            implementation,
            chunk_size,
            max_nodes,
            no_accessibility,
            snapshot_dir,
            snapshot_id,
            fail_on,
            timeout,
            format,
            output,
        } => {
            run_compare(
                &raw_args,
                args.config,
                args.verbose,
                design,
                implementation,
                chunk_size,
                max_nodes,
                no_accessibility,
                snapshot_dir,
                snapshot_id,
                fail_on,
                timeout,
                format,
                output,
            )
            .await
        }
        Commands::Snapshots { action } => match action {
            SnapshotAction::List { dir, format } => run_snapshots_list(args.config, dir, format),
            SnapshotAction::Prune { dir, keep, format } => {
                run_snapshots_prune(args.config, dir, keep, format)
            }
        },
    }
}
