//! In-memory storage backend.
//!
//! Simple maps protected by `RwLock`, with ids handed out by atomic
//! counters. On its own the backend is transient and reports
//! `supports_persistence = false`. Opened with a snapshot path it loads the
//! snapshot on open, rewrites it on commit (when `sync_on_commit`) and on
//! shutdown, and reports `supports_persistence = true`.
//!
//! Each transaction keeps an undo log. `rollback_tx()` replays it, and so
//! does `commit_tx()` when the snapshot write fails, so a failed commit
//! leaves no trace in memory.
//!
//! ## Limitations
//!
//! - **No isolation**: writes are visible to other transactions before
//!   commit.
//! - **Whole-file snapshots**: every flush rewrites the full graph.
//!
//! Locks are always taken in the order `nodes` → `relationships` →
//! `adjacency`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::*;
use crate::tx::{Transaction, TxMode, TxId};
use crate::{Error, Result};
use super::snapshot::{self, GraphSnapshot, SNAPSHOT_VERSION};
use super::{BackendConfig, StorageBackend, StoreFeatures};

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory property graph storage, optionally backed by a snapshot file.
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
    snapshot: Option<SnapshotTarget>,
}

struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → list of relationship IDs
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    variables: RwLock<PropertyMap>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
    next_tx_id: AtomicU64,
}

#[derive(Debug, Clone)]
struct SnapshotTarget {
    path: PathBuf,
    sync_on_commit: bool,
}

impl MemoryBackend {
    /// A transient backend.
    pub fn new() -> Self {
        Self::from_snapshot(GraphSnapshot::default(), None)
    }

    /// Open according to `config`.
    pub fn open(config: &BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Memory => Ok(Self::new()),
            BackendConfig::Snapshot { path, sync_on_commit } => {
                Self::with_snapshot(path.clone(), *sync_on_commit)
            }
        }
    }

    /// A durable backend persisted to `path`. An existing snapshot is loaded.
    pub fn with_snapshot(path: impl Into<PathBuf>, sync_on_commit: bool) -> Result<Self> {
        let path = path.into();
        let state = match snapshot::load(&path)? {
            Some(state) => {
                tracing::info!(
                    path = %path.display(),
                    nodes = state.nodes.len(),
                    relationships = state.relationships.len(),
                    "loaded graph snapshot"
                );
                state
            }
            None => GraphSnapshot::default(),
        };
        Ok(Self::from_snapshot(state, Some(SnapshotTarget { path, sync_on_commit })))
    }

    fn from_snapshot(state: GraphSnapshot, target: Option<SnapshotTarget>) -> Self {
        let mut adjacency: HashMap<NodeId, Vec<RelId>> = HashMap::new();
        for node in &state.nodes {
            adjacency.insert(node.id, Vec::new());
        }
        for rel in &state.relationships {
            adjacency.entry(rel.src).or_default().push(rel.id);
            if rel.src != rel.dst {
                adjacency.entry(rel.dst).or_default().push(rel.id);
            }
        }

        Self {
            inner: Arc::new(MemoryInner {
                nodes: RwLock::new(state.nodes.into_iter().map(|n| (n.id, n)).collect()),
                relationships: RwLock::new(
                    state.relationships.into_iter().map(|r| (r.id, r)).collect(),
                ),
                adjacency: RwLock::new(adjacency),
                variables: RwLock::new(state.variables),
                next_node_id: AtomicU64::new(state.next_node_id),
                next_rel_id: AtomicU64::new(state.next_rel_id),
                next_tx_id: AtomicU64::new(1),
            }),
            snapshot: target,
        }
    }

    /// Capture the current state. Nodes and relationships are sorted by id
    /// so that identical graphs produce identical files.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self.inner.nodes.read();
        let rels = self.inner.relationships.read();

        let mut node_list: Vec<Node> = nodes.values().cloned().collect();
        node_list.sort_by_key(|n| n.id);
        let mut rel_list: Vec<Relationship> = rels.values().cloned().collect();
        rel_list.sort_by_key(|r| r.id);

        GraphSnapshot {
            version: SNAPSHOT_VERSION,
            written_at: chrono::Utc::now(),
            next_node_id: self.inner.next_node_id.load(Ordering::Relaxed),
            next_rel_id: self.inner.next_rel_id.load(Ordering::Relaxed),
            nodes: node_list,
            relationships: rel_list,
            variables: self.inner.variables.read().clone(),
        }
    }

    /// Write the snapshot file, if this backend has one.
    pub fn flush(&self) -> Result<()> {
        let Some(target) = &self.snapshot else { return Ok(()) };
        let state = self.to_snapshot();
        snapshot::save(&target.path, &state)?;
        tracing::debug!(
            path = %target.path.display(),
            nodes = state.nodes.len(),
            relationships = state.relationships.len(),
            "wrote graph snapshot"
        );
        Ok(())
    }

    fn sync_on_write(&self) -> Result<()> {
        match &self.snapshot {
            Some(target) if target.sync_on_commit => self.flush(),
            _ => Ok(()),
        }
    }

    /// Snapshots are JSON, which cannot encode NaN or infinity.
    fn ensure_storable<'a>(&self, values: impl IntoIterator<Item = &'a Value>) -> Result<()> {
        if self.snapshot.is_none() {
            return Ok(());
        }
        match values.into_iter().find(|v| !v.is_finite()) {
            Some(v) => Err(Error::ConstraintViolation(format!(
                "non-finite float {v} cannot be written to a snapshot"
            ))),
            None => Ok(()),
        }
    }

    /// Insert an edge and index it under both endpoints.
    fn link_relationship(&self, rel: Relationship) {
        let mut rels = self.inner.relationships.write();
        let mut adj = self.inner.adjacency.write();
        adj.entry(rel.src).or_default().push(rel.id);
        if rel.src != rel.dst {
            adj.entry(rel.dst).or_default().push(rel.id);
        }
        rels.insert(rel.id, rel);
    }

    fn unlink_relationship(&self, id: RelId) -> Option<Relationship> {
        let mut rels = self.inner.relationships.write();
        let mut adj = self.inner.adjacency.write();
        let removed = rels.remove(&id)?;
        for end in [removed.src, removed.dst] {
            if let Some(ids) = adj.get_mut(&end) {
                ids.retain(|rid| *rid != id);
            }
        }
        Some(removed)
    }

    /// Replay an undo log, newest entry first.
    fn undo(&self, log: Vec<Undo>) {
        for entry in log.into_iter().rev() {
            match entry {
                Undo::CreatedNode(id) => {
                    let mut nodes = self.inner.nodes.write();
                    let mut adj = self.inner.adjacency.write();
                    nodes.remove(&id);
                    adj.remove(&id);
                }
                Undo::DeletedNode(node) => {
                    let mut nodes = self.inner.nodes.write();
                    let mut adj = self.inner.adjacency.write();
                    adj.entry(node.id).or_default();
                    nodes.insert(node.id, node);
                }
                Undo::NodeProperty { id, key, previous } => {
                    if let Some(node) = self.inner.nodes.write().get_mut(&id) {
                        restore(&mut node.properties, key, previous);
                    }
                }
                Undo::CreatedRel(id) => {
                    self.unlink_relationship(id);
                }
                Undo::DeletedRel(rel) => self.link_relationship(rel),
                Undo::RelProperty { id, key, previous } => {
                    if let Some(rel) = self.inner.relationships.write().get_mut(&id) {
                        restore(&mut rel.properties, key, previous);
                    }
                }
            }
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn restore(props: &mut PropertyMap, key: String, previous: Option<Value>) {
    match previous {
        Some(val) => { props.insert(key, val); }
        None => { props.remove(&key); }
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

/// One reversible write.
#[derive(Debug)]
enum Undo {
    CreatedNode(NodeId),
    DeletedNode(Node),
    NodeProperty { id: NodeId, key: String, previous: Option<Value> },
    CreatedRel(RelId),
    DeletedRel(Relationship),
    RelProperty { id: RelId, key: String, previous: Option<Value> },
}

/// In-memory transaction: a mode plus the undo log of its writes.
#[derive(Debug)]
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
    undo: Vec<Undo>,
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

fn ensure_writable(tx: &MemoryTx) -> Result<()> {
    if tx.mode.is_writable() {
        Ok(())
    } else {
        Err(Error::TxError(format!("transaction {} is read-only", tx.id.0)))
    }
}

// ============================================================================
// StorageBackend impl
// ============================================================================

#[async_trait]
impl StorageBackend for MemoryBackend {
    type Tx = MemoryTx;

    async fn shutdown(&self) -> Result<()> {
        self.flush()
    }

    fn store_features(&self) -> StoreFeatures {
        StoreFeatures { supports_persistence: self.snapshot.is_some() }
    }

    async fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed));
        Ok(MemoryTx { id, mode, undo: Vec::new() })
    }

    /// Writes the snapshot when `sync_on_commit` is set. If that write fails
    /// the transaction's changes are reverted and the error returned.
    async fn commit_tx(&self, tx: MemoryTx) -> Result<()> {
        if tx.undo.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.sync_on_write() {
            tracing::error!(tx = tx.id.0, error = %e, "snapshot write failed, reverting transaction");
            self.undo(tx.undo);
            return Err(e);
        }
        Ok(())
    }

    async fn rollback_tx(&self, tx: MemoryTx) -> Result<()> {
        self.undo(tx.undo);
        Ok(())
    }

    // ========================================================================
    // Vertex CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        ensure_writable(tx)?;
        self.ensure_storable(props.values())?;
        let id = NodeId(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };

        let mut nodes = self.inner.nodes.write();
        let mut adj = self.inner.adjacency.write();
        nodes.insert(id, node);
        adj.insert(id, Vec::new());
        tx.undo.push(Undo::CreatedNode(id));

        Ok(id)
    }

    async fn get_node(&self, _tx: &MemoryTx, id: NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(&id).cloned())
    }

    async fn delete_node(&self, tx: &mut MemoryTx, id: NodeId) -> Result<bool> {
        ensure_writable(tx)?;
        // Both locks held across check and removal, so no edge can attach in between.
        let mut nodes = self.inner.nodes.write();
        let mut adj = self.inner.adjacency.write();
        if let Some(rels) = adj.get(&id) {
            if !rels.is_empty() {
                return Err(Error::ConstraintViolation(format!(
                    "Cannot delete node {id} with {} relationships. Delete relationships first.",
                    rels.len()
                )));
            }
        }

        let removed = nodes.remove(&id);
        adj.remove(&id);
        match removed {
            Some(node) => {
                tx.undo.push(Undo::DeletedNode(node));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_node_property(
        &self,
        tx: &mut MemoryTx,
        id: NodeId,
        key: &str,
        val: Value,
    ) -> Result<()> {
        ensure_writable(tx)?;
        self.ensure_storable([&val])?;
        let mut nodes = self.inner.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        let previous = node.properties.insert(key.to_string(), val);
        tx.undo.push(Undo::NodeProperty { id, key: key.to_string(), previous });
        Ok(())
    }

    // ========================================================================
    // Edge CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        ensure_writable(tx)?;
        self.ensure_storable(props.values())?;

        // Held until the edge is linked; delete_node needs the write lock.
        let nodes = self.inner.nodes.read();
        if !nodes.contains_key(&src) {
            return Err(Error::NotFound(format!("Source node {src}")));
        }
        if !nodes.contains_key(&dst) {
            return Err(Error::NotFound(format!("Target node {dst}")));
        }

        let id = RelId(self.inner.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let mut rel = Relationship::new(id, src, dst, rel_type);
        rel.properties = props;
        self.link_relationship(rel);
        tx.undo.push(Undo::CreatedRel(id));

        Ok(id)
    }

    async fn get_relationship(&self, _tx: &MemoryTx, id: RelId) -> Result<Option<Relationship>> {
        Ok(self.inner.relationships.read().get(&id).cloned())
    }

    async fn delete_relationship(&self, tx: &mut MemoryTx, id: RelId) -> Result<bool> {
        ensure_writable(tx)?;
        match self.unlink_relationship(id) {
            Some(rel) => {
                tx.undo.push(Undo::DeletedRel(rel));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_relationship_property(
        &self,
        tx: &mut MemoryTx,
        id: RelId,
        key: &str,
        val: Value,
    ) -> Result<()> {
        ensure_writable(tx)?;
        self.ensure_storable([&val])?;
        let mut rels = self.inner.relationships.write();
        let rel = rels.get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Relationship {id}")))?;
        let previous = rel.properties.insert(key.to_string(), val);
        tx.undo.push(Undo::RelProperty { id, key: key.to_string(), previous });
        Ok(())
    }

    async fn get_relationships(
        &self,
        _tx: &MemoryTx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>> {
        let rels = self.inner.relationships.read();
        let adj = self.inner.adjacency.read();

        Ok(adj.get(&node)
            .into_iter()
            .flatten()
            .filter_map(|rid| rels.get(rid))
            .filter(|rel| rel.matches(node, dir))
            .filter(|rel| rel_type.is_none_or(|t| rel.rel_type == t))
            .cloned()
            .collect())
    }

    // ========================================================================
    // Graph variables
    // ========================================================================

    async fn get_variable(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.variables.read().get(key).cloned())
    }

    /// On a failed snapshot write the previous value is restored.
    async fn set_variable(&self, key: &str, val: Value) -> Result<()> {
        self.ensure_storable([&val])?;
        let previous = self.inner.variables.write().insert(key.to_string(), val);
        if let Err(e) = self.sync_on_write() {
            restore(&mut self.inner.variables.write(), key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn remove_variable(&self, key: &str) -> Result<Option<Value>> {
        let removed = self.inner.variables.write().remove(key);
        if removed.is_some() {
            if let Err(e) = self.sync_on_write() {
                restore(&mut self.inner.variables.write(), key.to_string(), removed);
                return Err(e);
            }
        }
        Ok(removed)
    }

    async fn variable_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.inner.variables.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    async fn node_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.nodes.read().len() as u64)
    }

    async fn relationship_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.relationships.read().len() as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
