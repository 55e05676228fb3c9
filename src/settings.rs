use std::path::{Path, PathBuf};
use std::time::Duration;

use ddc_lib::{CompareOptions, Config, DdcError, SnapshotOptions};
use tracing::info;

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct CompareFlagSources {
    pub chunk_size: bool,
    pub max_nodes: bool,
    pub timeout: bool,
}

impl CompareFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            chunk_size: flag_present(args, "--chunk-size"),
            max_nodes: flag_present(args, "--max-nodes"),
            timeout: flag_present(args, "--timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCompareSettings {
    pub chunk_size: usize,
    pub max_nodes: usize,
    pub accessibility_checks: bool,
    pub timeout: Duration,
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_id: Option<String>,
    pub max_records: usize,
    pub include_inputs: bool,
}

impl ResolvedCompareSettings {
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            chunk_size: self.chunk_size,
            max_nodes: self.max_nodes,
            accessibility_checks: self.accessibility_checks,
            snapshot: SnapshotOptions {
                enabled: self.snapshot_dir.is_some(),
                id: self.snapshot_id.clone(),
                include_inputs: self.include_inputs,
                max_records: self.max_records,
            },
        }
    }
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
#[allow(clippy::too_many_arguments)]
pub fn resolve_compare_settings(
    cli_chunk_size: usize,
    cli_max_nodes: usize,
    cli_timeout: Duration,
    cli_no_accessibility: bool,
    cli_snapshot_dir: Option<PathBuf>,
    cli_snapshot_id: Option<String>,
    config: &Config,
    flags: &CompareFlagSources,
) -> ResolvedCompareSettings {
    ResolvedCompareSettings {
        chunk_size: if flags.chunk_size {
            cli_chunk_size
        } else {
            config.limits.chunk_size
        },
        max_nodes: if flags.max_nodes {
            cli_max_nodes
        } else {
            config.limits.max_nodes
        },
        timeout: if flags.timeout {
            cli_timeout
        } else {
            config.timeout
        },
        accessibility_checks: config.accessibility.enabled && !cli_no_accessibility,
        snapshot_dir: cli_snapshot_dir.or_else(|| config.snapshots.directory.clone()),
        snapshot_id: cli_snapshot_id,
        max_records: config.snapshots.max_records,
        include_inputs: config.snapshots.include_inputs,
    }
}

/// Load config from a TOML file, `./ddc.toml`, or return defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, DdcError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ddc_lib::config::DEFAULT_CONFIG_FILE.to_string());
        DdcError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DdcError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Log the effective config (verbose mode).
pub fn log_effective_config(config_path: Option<&Path>, settings: &ResolvedCompareSettings) {
    info!("{}", format_effective_config(settings, config_path));
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    settings: &ResolvedCompareSettings,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let snapshots = settings
        .snapshot_dir
        .as_ref()
        .map(|d| format!("{} (keep {})", d.display(), settings.max_records))
        .unwrap_or_else(|| "off".to_string());
    format!(
        "Effective config [{source}]: chunk_size={}, max_nodes={}, accessibility={}, timeout={}s, snapshots={}",
        settings.chunk_size,
        settings.max_nodes,
        settings.accessibility_checks,
        settings.timeout.as_secs(),
        snapshots,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_compare_settings_prefers_config_when_flags_absent() {
        let mut cfg = Config::default();
        cfg.limits.chunk_size = 4;
        cfg.limits.max_nodes = 25;
        cfg.timeout = Duration::from_secs(7);
        cfg.snapshots.directory = Some(PathBuf::from("from-config"));
        cfg.snapshots.max_records = 3;

        let resolved = resolve_compare_settings(
            10,
            1000,
            Duration::from_secs(120),
            false,
            None,
            None,
            &cfg,
            &CompareFlagSources::default(),
        );

        assert_eq!(resolved.chunk_size, 4);
        assert_eq!(resolved.max_nodes, 25);
        assert_eq!(resolved.timeout, Duration::from_secs(7));
        assert_eq!(resolved.snapshot_dir, Some(PathBuf::from("from-config")));
        assert!(resolved.accessibility_checks);

        let options = resolved.compare_options();
        assert!(options.snapshot.enabled);
        assert_eq!(options.snapshot.max_records, 3);
    }

    #[test]
    fn resolve_compare_settings_prefers_cli_when_flags_present() {
        let cfg = Config::default();
        let flags = CompareFlagSources {
            chunk_size: true,
            max_nodes: true,
            timeout: true,
        };
        let resolved = resolve_compare_settings(
            2,
            50,
            Duration::from_secs(5),
            true,
            Some(PathBuf::from("snaps")),
            Some("run-7".into()),
            &cfg,
            &flags,
        );

        assert_eq!(resolved.chunk_size, 2);
        assert_eq!(resolved.max_nodes, 50);
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert!(!resolved.accessibility_checks);
        assert_eq!(resolved.compare_options().snapshot.id.as_deref(), Some("run-7"));
    }

    #[test]
    fn snapshots_disabled_without_directory() {
        let resolved = resolve_compare_settings(
            10,
            1000,
            Duration::from_secs(120),
            false,
            None,
            None,
            &Config::default(),
            &CompareFlagSources::default(),
        );
        assert!(!resolved.compare_options().snapshot.enabled);
    }

    #[test]
    fn flag_present_accepts_equals_form() {
        let args: Vec<String> = ["ddc", "compare", "--chunk-size=3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let flags = CompareFlagSources::from_args(&args);
        assert!(flags.chunk_size);
        assert!(!flags.max_nodes);
        assert!(!flags.timeout);
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let settings = ResolvedCompareSettings {
            chunk_size: 5,
            max_nodes: 200,
            accessibility_checks: false,
            timeout: Duration::from_secs(30),
            snapshot_dir: Some(PathBuf::from("snaps")),
            snapshot_id: None,
            max_records: 12,
            include_inputs: false,
        };
        let summary = format_effective_config(&settings, Some(Path::new("ddc.toml")));
        assert!(summary.contains("chunk_size=5"));
        assert!(summary.contains("max_nodes=200"));
        assert!(summary.contains("accessibility=false"));
        assert!(summary.contains("timeout=30s"));
        assert!(summary.contains("snaps (keep 12)"));
        assert!(summary.contains("ddc.toml"));
    }
}
