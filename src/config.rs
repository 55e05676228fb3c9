use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DdcError, Result};
use crate::sanitize::SanitizeLimits;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ddc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub matching: MatchingConfig,
    pub limits: Limits,
    pub accessibility: AccessibilityConfig,
    pub snapshots: SnapshotConfig,
    /// Root font size used to resolve `rem`/`em` lengths
    pub base_font_size: f64,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Per-property tolerances. A difference strictly greater than the
/// tolerance is a deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub color: f64,
    pub font_size: f64,
    pub font_weight: f64,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub spacing: f64,
    pub dimension: f64,
    pub radius: f64,
    pub border_width: f64,
    pub shadow: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            color: 10.0,
            font_size: 2.0,
            font_weight: 0.0,
            line_height: 2.0,
            letter_spacing: 0.5,
            spacing: 2.0,
            dimension: 2.0,
            radius: 1.0,
            border_width: 1.0,
            shadow: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Best score must be strictly greater than this to pair
    pub acceptance_floor: f64,
    /// Lab distance at which color similarity reaches zero
    pub color_tolerance: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            acceptance_floor: 0.30,
            color_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub chunk_size: usize,
    pub max_nodes: usize,
    pub max_string_length: usize,
    pub max_array_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            max_nodes: 1000,
            max_string_length: 1000,
            max_array_length: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    pub enabled: bool,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub directory: Option<PathBuf>,
    pub max_records: usize,
    pub include_inputs: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            directory: None,
            max_records: 50,
            include_inputs: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            matching: MatchingConfig::default(),
            limits: Limits::default(),
            accessibility: AccessibilityConfig::default(),
            snapshots: SnapshotConfig::default(),
            base_font_size: 16.0,
            timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    /// Load config from an explicit path, `./ddc.toml`, or defaults (in that order).
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };

        match candidate {
            Some(p) => {
                let raw = std::fs::read_to_string(&p)?;
                Config::from_toml(&raw)
            }
            None => Ok(Config::default()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Config> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limits.chunk_size == 0 {
            return Err(DdcError::Config("chunk_size must be at least 1".into()));
        }
        if self.limits.max_nodes == 0 {
            return Err(DdcError::Config("max_nodes must be at least 1".into()));
        }
        if self.limits.max_string_length < 4 {
            return Err(DdcError::Config(
                "max_string_length must leave room for the ellipsis marker (>= 4)".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.matching.acceptance_floor) {
            return Err(DdcError::Config(format!(
                "matching acceptance floor must be within 0..1, got {}",
                self.matching.acceptance_floor
            )));
        }
        if !(self.matching.color_tolerance > 0.0) {
            return Err(DdcError::Config(
                "matching color_tolerance threshold must be positive".into(),
            ));
        }
        if !(self.base_font_size > 0.0) {
            return Err(DdcError::Config("base_font_size must be positive".into()));
        }
        let t = &self.thresholds;
        let named = [
            ("color", t.color),
            ("font_size", t.font_size),
            ("font_weight", t.font_weight),
            ("line_height", t.line_height),
            ("letter_spacing", t.letter_spacing),
            ("spacing", t.spacing),
            ("dimension", t.dimension),
            ("radius", t.radius),
            ("border_width", t.border_width),
            ("shadow", t.shadow),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(DdcError::Config(format!(
                    "threshold '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Immutable settings the comparison engine is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub matching: MatchingConfig,
    pub sanitize: SanitizeLimits,
    pub base_font_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::from(&Config::default())
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds,
            matching: config.matching,
            sanitize: SanitizeLimits {
                max_string_length: config.limits.max_string_length,
                max_array_length: config.limits.max_array_length,
            },
            base_font_size: config.base_font_size,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let mut config = Config {
            thresholds: self.thresholds,
            matching: self.matching,
            base_font_size: self.base_font_size,
            ..Config::default()
        };
        config.limits.max_string_length = self.sanitize.max_string_length;
        config.limits.max_array_length = self.sanitize.max_array_length;
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert!((cfg.thresholds.color - 10.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.font_size - 2.0).abs() < f64::EPSILON);
        assert!((cfg.matching.acceptance_floor - 0.30).abs() < f64::EPSILON);
        assert_eq!(cfg.limits.chunk_size, 10);
        assert_eq!(cfg.limits.max_string_length, 1000);
        assert_eq!(cfg.limits.max_array_length, 1000);
        assert_eq!(cfg.snapshots.max_records, 50);
        assert!(cfg.accessibility.enabled);
        assert_eq!(cfg.timeout, Duration::from_secs(120));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let cfg = Config::from_toml(
            r#"
            timeout = "30s"

            [limits]
            chunk_size = 4

            [thresholds]
            color = 5.0
            "#,
        )
        .expect("parse config");

        assert_eq!(cfg.limits.chunk_size, 4);
        assert_eq!(cfg.limits.max_nodes, 1000);
        assert!((cfg.thresholds.color - 5.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.font_size - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let mut cfg = Config::default();
        cfg.limits.chunk_size = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn validate_rejects_floor_outside_unit_range() {
        let mut cfg = Config::default();
        cfg.matching.acceptance_floor = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let mut cfg = Config::default();
        cfg.thresholds.spacing = -1.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("spacing"));
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "base_font_size = 10.0\n[accessibility]\nenabled = false").unwrap();

        let cfg = Config::load(Some(file.path())).expect("load config");
        assert!((cfg.base_font_size - 10.0).abs() < f64::EPSILON);
        assert!(!cfg.accessibility.enabled);
    }

    #[test]
    fn engine_config_carries_limits_and_thresholds() {
        let mut cfg = Config::default();
        cfg.limits.max_string_length = 64;
        cfg.thresholds.radius = 3.0;
        let engine = EngineConfig::from(&cfg);
        assert_eq!(engine.sanitize.max_string_length, 64);
        assert!((engine.thresholds.radius - 3.0).abs() < f64::EPSILON);
        assert!(engine.validate().is_ok());
    }
}
