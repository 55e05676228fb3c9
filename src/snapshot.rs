//! Snapshot persistence for completed comparison runs.
//!
//! The engine only talks to [`SnapshotStore`]. Two implementations ship with
//! the crate: [`FileSnapshotStore`] writes one JSON document per run into a
//! directory, [`MemorySnapshotStore`] keeps everything in process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{DdcError, Result};

/// Number of snapshots kept when no explicit limit is configured.
pub const DEFAULT_MAX_RECORDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Value,
}

impl SnapshotRecord {
    /// A record with a random id when `id` is `None`.
    pub fn new(id: Option<String>, metadata: Value) -> Self {
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            created_at: Utc::now(),
            metadata,
        }
    }
}

pub trait SnapshotStore: Send + Sync {
    fn save_snapshot(&self, record: &SnapshotRecord, payload: &Value) -> Result<()>;

    /// All stored records, newest first.
    fn list_snapshots(&self) -> Result<Vec<SnapshotRecord>>;

    /// Keep the newest `max_records` snapshots. Returns how many were removed.
    fn prune_snapshots(&self, max_records: usize) -> Result<usize>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    record: SnapshotRecord,
    payload: Value,
}

fn newest_first(records: &mut [SnapshotRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

/// One `<id>.json` file per snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(DdcError::snapshot(format!("invalid snapshot id '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn read_documents(&self) -> Result<Vec<(PathBuf, SnapshotRecord)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(DdcError::from)
                .and_then(|raw| Ok(serde_json::from_str::<SnapshotDocument>(&raw)?));
            match parsed {
                Ok(doc) => found.push((path, doc.record)),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable snapshot"),
            }
        }
        found.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(found)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save_snapshot(&self, record: &SnapshotRecord, payload: &Value) -> Result<()> {
        let path = self.path_for(&record.id)?;
        let doc = SnapshotDocument {
            record: record.clone(),
            payload: payload.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;
        fs::create_dir_all(&self.dir)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DdcError::snapshot(format!(
                    "snapshot '{}' already exists; snapshots are immutable",
                    record.id
                )));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&bytes)?;
        debug!(id = %record.id, path = %path.display(), "snapshot written");
        Ok(())
    }

    fn list_snapshots(&self) -> Result<Vec<SnapshotRecord>> {
        Ok(self
            .read_documents()?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    fn prune_snapshots(&self, max_records: usize) -> Result<usize> {
        let mut removed = 0;
        for (path, record) in self.read_documents()?.into_iter().skip(max_records) {
            fs::remove_file(&path)?;
            debug!(id = %record.id, "snapshot pruned");
            removed += 1;
        }
        Ok(removed)
    }
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<Vec<(SnapshotRecord, Value)>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored payload for `id`.
    pub fn payload(&self, id: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries
            .iter()
            .find(|(record, _)| record.id == id)
            .map(|(_, payload)| payload.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<(SnapshotRecord, Value)>>> {
        self.entries
            .lock()
            .map_err(|_| DdcError::snapshot("snapshot store lock poisoned"))
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save_snapshot(&self, record: &SnapshotRecord, payload: &Value) -> Result<()> {
        let mut entries = self.lock()?;
        if entries.iter().any(|(r, _)| r.id == record.id) {
            return Err(DdcError::snapshot(format!(
                "snapshot '{}' already exists; snapshots are immutable",
                record.id
            )));
        }
        entries.push((record.clone(), payload.clone()));
        Ok(())
    }

    fn list_snapshots(&self) -> Result<Vec<SnapshotRecord>> {
        let mut records: Vec<SnapshotRecord> =
            self.lock()?.iter().map(|(r, _)| r.clone()).collect();
        newest_first(&mut records);
        Ok(records)
    }

    fn prune_snapshots(&self, max_records: usize) -> Result<usize> {
        let keep: Vec<String> = self
            .list_snapshots()?
            .into_iter()
            .take(max_records)
            .map(|r| r.id)
            .collect();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|(r, _)| keep.contains(&r.id));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn record(id: &str, minutes_ago: i64) -> SnapshotRecord {
        SnapshotRecord {
            id: id.to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            metadata: json!({ "components": 1 }),
        }
    }

    fn exercise(store: &dyn SnapshotStore) {
        store.save_snapshot(&record("old", 30), &json!({ "n": 1 })).unwrap();
        store.save_snapshot(&record("new", 1), &json!({ "n": 2 })).unwrap();
        store.save_snapshot(&record("mid", 10), &json!({ "n": 3 })).unwrap();

        let ids: Vec<String> = store.list_snapshots().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        assert!(store.save_snapshot(&record("new", 0), &json!({})).is_err());

        assert_eq!(store.prune_snapshots(2).unwrap(), 1);
        let ids: Vec<String> = store.list_snapshots().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid"]);
        assert_eq!(store.prune_snapshots(5).unwrap(), 0);
    }

    #[test]
    fn memory_store_orders_and_prunes() {
        let store = MemorySnapshotStore::new();
        exercise(&store);
        assert_eq!(store.payload("mid"), Some(json!({ "n": 3 })));
    }

    #[test]
    fn file_store_orders_and_prunes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshots"));
        exercise(&store);
        assert!(dir.path().join("snapshots/new.json").is_file());
        assert!(!dir.path().join("snapshots/old.json").exists());
    }

    #[test]
    fn concurrent_saves_of_one_id_keep_the_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let barrier = std::sync::Barrier::new(8);

        let results: Vec<(usize, Result<()>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|n| {
                    let (store, barrier) = (&store, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        (n, store.save_snapshot(&record("shared", 0), &json!({ "writer": n })))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<usize> = results
            .iter()
            .filter(|(_, r)| r.is_ok())
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(winners.len(), 1);
        for (_, result) in results.iter().filter(|(_, r)| r.is_err()) {
            let message = result.as_ref().unwrap_err().to_string();
            assert!(message.contains("already exists"), "{message}");
        }

        let raw = fs::read_to_string(dir.path().join("shared.json")).unwrap();
        let doc: SnapshotDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc.payload, json!({ "writer": winners[0] }));
    }

    #[test]
    fn file_store_lists_nothing_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("absent"));
        assert!(store.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let err = store
            .save_snapshot(&record("../escape", 0), &json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid snapshot id"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = SnapshotRecord::new(None, Value::Null);
        let b = SnapshotRecord::new(None, Value::Null);
        assert_ne!(a.id, b.id);
    }
}
