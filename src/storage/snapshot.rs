//! JSON snapshot files — what makes a `MemoryBackend` durable.
//!
//! The whole graph is written as one document. Writes go to a sibling
//! `*.tmp` file first and are renamed over the target, so a crash mid-write
//! leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::Result;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized state of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub written_at: DateTime<Utc>,
    pub next_node_id: u64,
    pub next_rel_id: u64,
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub variables: PropertyMap,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            written_at: Utc::now(),
            next_node_id: 1,
            next_rel_id: 1,
            nodes: Vec::new(),
            relationships: Vec::new(),
            variables: PropertyMap::new(),
        }
    }
}

/// Read a snapshot. `Ok(None)` if the file does not exist yet.
pub fn load(path: &Path) -> Result<Option<GraphSnapshot>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let snapshot: GraphSnapshot = serde_json::from_slice(&bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(crate::Error::StorageError(format!(
            "unsupported snapshot version {} in {}",
            snapshot.version,
            path.display()
        )));
    }
    Ok(Some(snapshot))
}

/// Write a snapshot atomically (temp file + rename).
pub fn save(path: &Path, snapshot: &GraphSnapshot) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graph.json");

        let mut snap = GraphSnapshot::default();
        snap.nodes.push(Node::new(NodeId(1)).with_labels(["Person"]));
        snap.next_node_id = 2;
        snap.variables.insert("schema".into(), Value::from("v1"));

        save(&path, &snap).unwrap();
        assert!(!tmp_path(&path).exists());
        assert_eq!(load(&path).unwrap(), Some(snap));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let snap = GraphSnapshot { version: 99, ..GraphSnapshot::default() };
        save(&path, &snap).unwrap();
        assert!(matches!(load(&path), Err(crate::Error::StorageError(_))));
    }
}
