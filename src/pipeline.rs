use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use ddc_lib::{DdcError, FileSnapshotStore, SnapshotStore};

/// Input file encodings accepted by `compare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Read a design or implementation file into a JSON value.
pub fn load_input(path: &Path) -> Result<Value, DdcError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        DdcError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let format = InputFormat::from_path(path);
    debug!(path = %path.display(), ?format, bytes = raw.len(), "loaded input");
    parse_input(&raw, format)
}

pub fn parse_input(raw: &str, format: InputFormat) -> Result<Value, DdcError> {
    Ok(match format {
        InputFormat::Json => serde_json::from_str(raw)?,
        InputFormat::Yaml => serde_yaml::from_str(raw)?,
    })
}

/// Snapshot store for `dir`, if snapshots are enabled.
pub fn snapshot_store(dir: Option<&Path>) -> Option<Arc<dyn SnapshotStore>> {
    dir.map(|d| Arc::new(FileSnapshotStore::new(d)) as Arc<dyn SnapshotStore>)
}

/// Snapshot directory from the flag or the config file.
pub fn resolve_snapshot_dir(
    cli_dir: Option<PathBuf>,
    config_dir: Option<&Path>,
) -> Result<PathBuf, DdcError> {
    cli_dir
        .or_else(|| config_dir.map(Path::to_path_buf))
        .ok_or_else(|| {
            DdcError::Config(
                "no snapshot directory; pass --dir or set [snapshots] directory in the config".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_format_follows_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("a.YML")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("extract")), InputFormat::Json);
    }

    #[test]
    fn yaml_and_json_parse_to_same_value() {
        let yaml = parse_input("components:\n  - id: \"1\"\n    name: Card\n", InputFormat::Yaml)
            .expect("parse yaml");
        let json = parse_input(r#"{"components":[{"id":"1","name":"Card"}]}"#, InputFormat::Json)
            .expect("parse json");
        assert_eq!(yaml, json);
    }

    #[test]
    fn load_input_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        let err = load_input(&missing).unwrap_err();
        assert!(matches!(err, DdcError::Io(_)));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn snapshot_dir_requires_a_source() {
        assert!(resolve_snapshot_dir(None, None).is_err());
        assert_eq!(
            resolve_snapshot_dir(None, Some(Path::new("cfg"))).unwrap(),
            PathBuf::from("cfg")
        );
        assert_eq!(
            resolve_snapshot_dir(Some(PathBuf::from("cli")), Some(Path::new("cfg"))).unwrap(),
            PathBuf::from("cli")
        );
    }
}
