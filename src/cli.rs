use clap::{Parser, Subcommand, ValueEnum};
use ddc_lib::Severity;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ddc")]
#[command(
    version,
    about = "Design Drift Checker - Reconcile design exports against rendered implementations",
    long_about = "Design Drift Checker (DDC)\n\nModes:\n- compare: pair design components with implementation elements and report per-property drift, accessibility issues and regression risk.\n- snapshots: list or prune stored comparison runs.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for thresholds/limits/snapshots/timeout; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a design export against an implementation extract
    Compare {
        #[arg(long, value_name = "FILE", help = "Design export (JSON, or YAML for .yaml/.yml)")]
        design: PathBuf,

        #[arg(
            long = "impl",
            value_name = "FILE",
            help = "Implementation extract (JSON, or YAML for .yaml/.yml)"
        )]
        implementation: PathBuf,

        #[arg(long, default_value = "10", help = "Components compared concurrently per chunk")]
        chunk_size: usize,

        #[arg(long, default_value = "1000", help = "Maximum nodes processed per side")]
        max_nodes: usize,

        #[arg(long, help = "Skip contrast/alt/accessible-name checks")]
        no_accessibility: bool,

        #[arg(long, value_name = "DIR", help = "Persist the run as a snapshot in DIR")]
        snapshot_dir: Option<PathBuf>,

        #[arg(long, value_name = "ID", help = "Snapshot id (random when omitted)")]
        snapshot_id: Option<String>,

        #[arg(
            long,
            value_enum,
            default_value = "high",
            help = "Exit with 1 when a deviation at or above this severity is found"
        )]
        fail_on: FailOn,

        #[arg(
            long,
            default_value = "120s",
            value_parser = parse_duration,
            help = "Abort the comparison after this long (e.g. 30s, 2m)"
        )]
        timeout: Duration,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
    /// Inspect stored comparison snapshots
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// List snapshots, newest first
    List {
        #[arg(long, value_name = "DIR", help = "Snapshot directory (defaults to config)")]
        dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },
    /// Delete all but the newest snapshots
    Prune {
        #[arg(long, value_name = "DIR", help = "Snapshot directory (defaults to config)")]
        dir: Option<PathBuf>,

        #[arg(long, value_name = "N", help = "Number of snapshots to keep (defaults to config)")]
        keep: Option<usize>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    High,
    Medium,
    Low,
    Never,
}

impl FailOn {
    pub fn severity(self) -> Option<Severity> {
        match self {
            FailOn::High => Some(Severity::High),
            FailOn::Medium => Some(Severity::Medium),
            FailOn::Low => Some(Severity::Low),
            FailOn::Never => None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, FailOn, OutputFormat, SnapshotAction};
    use clap::Parser;
    use ddc_lib::Severity;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn compare_command_uses_defaults() {
        let cli = Cli::parse_from(["ddc", "compare", "--design", "design.json", "--impl", "dom.json"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
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
                assert_eq!(design, PathBuf::from("design.json"));
                assert_eq!(implementation, PathBuf::from("dom.json"));
                assert_eq!(chunk_size, 10);
                assert_eq!(max_nodes, 1000);
                assert!(!no_accessibility);
                assert!(snapshot_dir.is_none());
                assert!(snapshot_id.is_none());
                assert_eq!(fail_on, FailOn::High);
                assert_eq!(timeout, Duration::from_secs(120));
                assert!(matches!(format, OutputFormat::Json));
                assert!(output.is_none());
            }
            _ => panic!("expected compare command"),
        }
    }

    #[test]
    fn compare_command_respects_overrides() {
        let cli = Cli::parse_from([
            "ddc",
            "--verbose",
            "compare",
            "--design",
            "design.yaml",
            "--impl",
            "dom.json",
            "--chunk-size",
            "3",
            "--no-accessibility",
            "--fail-on",
            "never",
            "--timeout",
            "1m 30s",
            "--format",
            "pretty",
            "-o",
            "report.json",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Compare {
                chunk_size,
                no_accessibility,
                fail_on,
                timeout,
                format,
                output,
                ..
            } => {
                assert_eq!(chunk_size, 3);
                assert!(no_accessibility);
                assert_eq!(fail_on.severity(), None);
                assert_eq!(timeout, Duration::from_secs(90));
                assert!(matches!(format, OutputFormat::Pretty));
                assert_eq!(output, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected compare command"),
        }
    }

    #[test]
    fn compare_requires_both_inputs() {
        assert!(Cli::try_parse_from(["ddc", "compare", "--design", "d.json"]).is_err());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let parsed = Cli::try_parse_from([
            "ddc", "compare", "--design", "d.json", "--impl", "i.json", "--timeout", "soon",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn snapshots_prune_parses_keep() {
        let cli = Cli::parse_from(["ddc", "snapshots", "prune", "--dir", "snaps", "--keep", "5"]);
        match cli.command {
            Commands::Snapshots {
                action: SnapshotAction::Prune { dir, keep, .. },
            } => {
                assert_eq!(dir, Some(PathBuf::from("snaps")));
                assert_eq!(keep, Some(5));
            }
            _ => panic!("expected snapshots prune"),
        }
    }

    #[test]
    fn fail_on_maps_to_severity() {
        assert_eq!(FailOn::Medium.severity(), Some(Severity::Medium));
        assert_eq!(FailOn::Low.severity(), Some(Severity::Low));
    }
}
