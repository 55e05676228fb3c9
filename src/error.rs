use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DdcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Comparison error: {0}")]
    Comparison(String),

    #[error("Comparison timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed during {stage} (design input: {design_input}, implementation input: {implementation_input}): {source}")]
    Stage {
        stage: Stage,
        design_input: String,
        implementation_input: String,
        #[source]
        source: Box<DdcError>,
    },
}

/// Pipeline stage reported when a run fails as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Sanitize,
    Parse,
    Validate,
    Match,
    Compare,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Sanitize => "sanitize",
            Stage::Parse => "parse",
            Stage::Validate => "validate",
            Stage::Match => "match",
            Stage::Compare => "compare",
            Stage::Aggregate => "aggregate",
        })
    }
}

impl DdcError {
    pub fn validation(message: impl Into<String>) -> Self {
        DdcError::Validation(message.into())
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        DdcError::Snapshot(message.into())
    }

    pub fn comparison(message: impl Into<String>) -> Self {
        DdcError::Comparison(message.into())
    }

    /// Wraps an error with the stage it happened in and the JSON kinds of both inputs.
    pub fn at_stage(
        self,
        stage: Stage,
        design_input: impl Into<String>,
        implementation_input: impl Into<String>,
    ) -> Self {
        DdcError::Stage {
            stage,
            design_input: design_input.into(),
            implementation_input: implementation_input.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers.
    pub fn root(&self) -> &DdcError {
        match self {
            DdcError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let message = self.to_string();
        match self.root() {
            DdcError::Io(_) => ErrorPayload::new(
                ErrorCategory::Io,
                message,
                "Check file paths/permissions.",
            ),
            DdcError::Serialization(_) | DdcError::Yaml(_) => ErrorPayload::new(
                ErrorCategory::Validation,
                message,
                "Check that the design and implementation files are valid JSON (or YAML for .yaml/.yml).",
            ),
            DdcError::Toml(_) => ErrorPayload::new(
                ErrorCategory::Config,
                message,
                "Fix the TOML syntax in the config file or pass --config with a valid file.",
            ),
            DdcError::Validation(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("components") {
                    ErrorPayload::new(
                        ErrorCategory::Validation,
                        message,
                        "Provide a design export with a `components` (or `nodes`) array.",
                    )
                } else if lower.contains("elements") {
                    ErrorPayload::new(
                        ErrorCategory::Validation,
                        message,
                        "Provide an implementation extract with an `elements` (or `nodes`) array.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Validation,
                        message,
                        "Inspect the input payloads; every design node needs an `id`.",
                    )
                }
            }
            DdcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("chunk") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        message,
                        "Use a chunk size of at least 1 (e.g., --chunk-size 10).",
                    )
                } else if lower.contains("threshold") || lower.contains("floor") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        message,
                        "Thresholds must be positive; the acceptance floor must be within 0..1.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        message,
                        "Check flags and the [limits]/[thresholds] sections of the config file.",
                    )
                }
            }
            DdcError::Snapshot(_) => ErrorPayload::new(
                ErrorCategory::Snapshot,
                message,
                "Check that the snapshot directory exists and is writable.",
            ),
            DdcError::Comparison(_) => ErrorPayload::new(
                ErrorCategory::Comparison,
                message,
                "Re-run with --verbose (or RUST_LOG=debug) for per-component logs.",
            ),
            DdcError::Timeout(_) => ErrorPayload::new(
                ErrorCategory::Timeout,
                message,
                "Increase --timeout or lower --max-nodes for very large trees.",
            ),
            DdcError::Stage { .. } => ErrorPayload::new(
                ErrorCategory::Unknown,
                message,
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, DdcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Validation,
    Io,
    Snapshot,
    Comparison,
    Timeout,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
