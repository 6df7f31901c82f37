//! # Storage Backend Trait
//!
//! The contract between the graph handle and a storage engine. A backend
//! contributes one thing to capability negotiation: the
//! [`StoreFeatures::supports_persistence`] bit it reports from
//! [`StorageBackend::store_features`].
//!
//! ## Implementations
//!
//! | Backend | Config | Persists |
//! |---------|--------|----------|
//! | `MemoryBackend` | `BackendConfig::Memory` | no |
//! | `MemoryBackend` | `BackendConfig::Snapshot { .. }` | yes, JSON snapshot |

pub mod memory;
pub mod snapshot;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::{Error, Result};

pub use memory::{MemoryBackend, MemoryTx};

// ============================================================================
// Backend Configuration
// ============================================================================

/// How to open a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// In-memory, discarded when the process exits.
    Memory,

    /// In-memory working set, durably written to a JSON snapshot file.
    Snapshot {
        path: PathBuf,
        /// Rewrite the snapshot on every commit, not only on shutdown.
        #[serde(default = "default_sync_on_commit")]
        sync_on_commit: bool,
    },
}

fn default_sync_on_commit() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Memory
    }
}

// ============================================================================
// Store features
// ============================================================================

/// What a backend reports about itself.
///
/// The capability model reads nothing here except `supports_persistence`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFeatures {
    pub supports_persistence: bool,
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// The universal storage contract.
///
/// Optional operations have defaults returning `Error::StorageError`; callers
/// are expected to consult the capability profile before reaching them.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// The transaction type for this backend.
    type Tx: Transaction;

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Shut down the backend, flushing any pending writes.
    async fn shutdown(&self) -> Result<()>;

    /// The backend's self-reported feature set.
    fn store_features(&self) -> StoreFeatures;

    // ========================================================================
    // Transactions
    // ========================================================================

    async fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;
    async fn commit_tx(&self, tx: Self::Tx) -> Result<()>;
    async fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Vertex CRUD
    // ========================================================================

    /// Create a vertex; the backend assigns its id.
    async fn create_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId>;

    /// Create a vertex under a caller-chosen id.
    ///
    /// Default returns error — override for backends that accept
    /// user-supplied ids.
    async fn create_node_with_id(
        &self,
        _tx: &mut Self::Tx,
        _id: NodeId,
        _labels: &[&str],
        _props: PropertyMap,
    ) -> Result<NodeId> {
        Err(Error::StorageError("user-supplied node ids not supported".into()))
    }

    async fn get_node(&self, tx: &Self::Tx, id: NodeId) -> Result<Option<Node>>;

    /// Delete a vertex. Returns true if it existed.
    /// Fails if the vertex still has edges.
    async fn delete_node(&self, tx: &mut Self::Tx, id: NodeId) -> Result<bool>;

    /// Set a property on a vertex (upsert).
    async fn set_node_property(
        &self,
        tx: &mut Self::Tx,
        id: NodeId,
        key: &str,
        val: Value,
    ) -> Result<()>;

    // ========================================================================
    // Edge CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId>;

    /// Default returns error — override for backends that accept
    /// user-supplied ids.
    async fn create_relationship_with_id(
        &self,
        _tx: &mut Self::Tx,
        _id: RelId,
        _src: NodeId,
        _dst: NodeId,
        _rel_type: &str,
        _props: PropertyMap,
    ) -> Result<RelId> {
        Err(Error::StorageError("user-supplied relationship ids not supported".into()))
    }

    async fn get_relationship(&self, tx: &Self::Tx, id: RelId) -> Result<Option<Relationship>>;

    async fn delete_relationship(&self, tx: &mut Self::Tx, id: RelId) -> Result<bool>;

    async fn set_relationship_property(
        &self,
        tx: &mut Self::Tx,
        id: RelId,
        key: &str,
        val: Value,
    ) -> Result<()>;

    /// All edges of a vertex, optionally filtered by direction and type.
    async fn get_relationships(
        &self,
        tx: &Self::Tx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>>;

    /// Delete a vertex and all its edges in one operation.
    ///
    /// Default: get all edges, delete each, then delete the vertex.
    async fn detach_delete_node(&self, tx: &mut Self::Tx, id: NodeId) -> Result<bool> {
        let rels = self.get_relationships(tx, id, Direction::Both, None).await?;
        for rel in &rels {
            self.delete_relationship(tx, rel.id).await?;
        }
        self.delete_node(tx, id).await
    }

    // ========================================================================
    // Graph variables
    // ========================================================================

    /// Default returns error — override for backends with variable storage.
    async fn get_variable(&self, _key: &str) -> Result<Option<Value>> {
        Err(Error::StorageError("graph variables not supported".into()))
    }

    async fn set_variable(&self, _key: &str, _val: Value) -> Result<()> {
        Err(Error::StorageError("graph variables not supported".into()))
    }

    async fn remove_variable(&self, _key: &str) -> Result<Option<Value>> {
        Err(Error::StorageError("graph variables not supported".into()))
    }

    async fn variable_keys(&self) -> Result<Vec<String>> {
        Err(Error::StorageError("graph variables not supported".into()))
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    async fn node_count(&self, tx: &Self::Tx) -> Result<u64>;
    async fn relationship_count(&self, tx: &Self::Tx) -> Result<u64>;
}
