//! # graph-features — Capability Profiles for a Property Graph Engine
//!
//! A backend-agnostic graph engine runs on pluggable storage backends that
//! differ in what they can do. Rather than letting callers find out by trial
//! and error, the engine exposes one precomputed, read-only
//! [`CapabilityProfile`] that validation code, planners and conformance
//! suites consult before attempting an operation.
//!
//! ## Design Principles
//!
//! 1. **One signal in**: a backend reports only whether it persists data
//! 2. **Two profiles out**: persistent and transient, built once as statics
//! 3. **No mutation path**: descriptors are `const` values with read accessors
//! 4. **Pre-flight, not trial-and-error**: the [`Graph`] handle checks the
//!    profile before touching the backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graph_features::{Graph, Value, props};
//!
//! # async fn example() -> graph_features::Result<()> {
//! let graph = Graph::open_memory().await?;
//!
//! let features = graph.features();
//! assert!(!features.graph().persists());
//! assert!(!features.vertex().supports_user_supplied_ids());
//!
//! let ada = graph.add_vertex(&["Person"], props([("name", "Ada")])).await?;
//!
//! // Rejected before reaching storage: properties are scalar-only.
//! let err = graph.set_vertex_property(ada, "tags", Value::from(vec!["a", "b"])).await;
//! assert!(err.is_err());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod capability;
pub mod model;
pub mod storage;
pub mod tx;
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use capability::{
    CapabilityProfile, resolve_profile,
    GraphCapabilities, VertexCapabilities, VertexPropertyCapabilities,
    EdgeCapabilities, EdgePropertyCapabilities,
    DataTypeCapabilities, IdentifierCapabilities,
    FeatureDomain, FeatureFlag,
};

pub use model::{
    Node, Relationship, Value, ValueShape, PropertyMap, props,
    NodeId, RelId, Direction,
};

pub use storage::{StorageBackend, BackendConfig, StoreFeatures, MemoryBackend};

pub use tx::{Transaction, TxMode, TxId};

pub use validate::{IdKind, Preflight};

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// A storage backend paired with the capability profile it resolved to.
///
/// The profile is resolved once, when the handle is created, from the
/// backend's reported persistence support.
pub struct Graph<B: StorageBackend> {
    backend: B,
    preflight: Preflight,
}

impl<B: StorageBackend> Graph<B> {
    /// Create a Graph with the given backend.
    pub fn with_backend(backend: B) -> Self {
        let store = backend.store_features();
        let profile = CapabilityProfile::for_store(&store);
        tracing::debug!(persists = profile.persists(), "resolved capability profile");
        Self { backend, preflight: Preflight::new(profile) }
    }

    /// The capability profile in force for this graph.
    pub fn features(&self) -> &'static CapabilityProfile {
        self.preflight.profile()
    }

    /// Access the underlying backend (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shut down the backend, flushing any pending writes.
    pub async fn close(self) -> Result<()> {
        self.backend.shutdown().await
    }

    /// Begin an explicit transaction.
    pub async fn begin(&self, mode: TxMode) -> Result<ExplicitTx<'_, B>> {
        self.preflight.check_transactions()?;
        let tx = self.backend.begin_tx(mode).await?;
        Ok(ExplicitTx { graph: self, tx })
    }

    // ========================================================================
    // Vertices
    // ========================================================================

    pub async fn add_vertex(&self, labels: &[&str], props: PropertyMap) -> Result<NodeId> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.add_vertex(labels, props).await;
        tx.finish(result).await
    }

    /// Add a vertex under a caller-chosen id.
    pub async fn add_vertex_with_id(
        &self,
        id: NodeId,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.add_vertex_with_id(id, labels, props).await;
        tx.finish(result).await
    }

    pub async fn vertex(&self, id: NodeId) -> Result<Option<Node>> {
        let tx = self.backend.begin_tx(TxMode::ReadOnly).await?;
        let node = self.backend.get_node(&tx, id).await?;
        self.backend.commit_tx(tx).await?;
        Ok(node)
    }

    pub async fn set_vertex_property(&self, id: NodeId, key: &str, value: Value) -> Result<()> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.set_vertex_property(id, key, value).await;
        tx.finish(result).await
    }

    /// Remove a vertex together with its edges.
    pub async fn remove_vertex(&self, id: NodeId) -> Result<bool> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = self.backend.detach_delete_node(&mut tx.tx, id).await;
        tx.finish(result).await
    }

    // ========================================================================
    // Edges
    // ========================================================================

    pub async fn add_edge(
        &self,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.add_edge(src, dst, rel_type, props).await;
        tx.finish(result).await
    }

    /// Add an edge under a caller-chosen id.
    pub async fn add_edge_with_id(
        &self,
        id: RelId,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.add_edge_with_id(id, src, dst, rel_type, props).await;
        tx.finish(result).await
    }

    pub async fn edge(&self, id: RelId) -> Result<Option<Relationship>> {
        let tx = self.backend.begin_tx(TxMode::ReadOnly).await?;
        let rel = self.backend.get_relationship(&tx, id).await?;
        self.backend.commit_tx(tx).await?;
        Ok(rel)
    }

    pub async fn set_edge_property(&self, id: RelId, key: &str, value: Value) -> Result<()> {
        let mut tx = self.begin(TxMode::ReadWrite).await?;
        let result = tx.set_edge_property(id, key, value).await;
        tx.finish(result).await
    }

    // ========================================================================
    // Graph variables
    // ========================================================================

    pub async fn set_variable(&self, key: &str, value: Value) -> Result<()> {
        self.preflight.check_variable(&value)?;
        self.backend.set_variable(key, value).await
    }

    pub async fn variable(&self, key: &str) -> Result<Option<Value>> {
        self.backend.get_variable(key).await
    }

    pub async fn remove_variable(&self, key: &str) -> Result<Option<Value>> {
        self.backend.remove_variable(key).await
    }

    /// Variable names, sorted.
    pub async fn variable_keys(&self) -> Result<Vec<String>> {
        self.backend.variable_keys().await
    }
}

impl Graph<MemoryBackend> {
    /// In-memory graph; resolves to the transient profile.
    pub async fn open_memory() -> Result<Self> {
        Ok(Self::with_backend(MemoryBackend::new()))
    }

    /// Open a memory or snapshot-backed graph from configuration.
    pub async fn open(config: &BackendConfig) -> Result<Self> {
        let backend = MemoryBackend::open(config)?;
        tracing::info!(?config, "opened graph");
        Ok(Self::with_backend(backend))
    }
}

// ============================================================================
// Explicit transactions
// ============================================================================

/// Explicit transaction handle. Every write is checked against the graph's
/// capability profile first.
pub struct ExplicitTx<'g, B: StorageBackend> {
    graph: &'g Graph<B>,
    tx: B::Tx,
}

impl<'g, B: StorageBackend> ExplicitTx<'g, B> {
    pub fn id(&self) -> TxId {
        self.tx.id()
    }

    pub async fn add_vertex(&mut self, labels: &[&str], props: PropertyMap) -> Result<NodeId> {
        self.graph.preflight.check_vertex_properties(&props)?;
        self.graph.backend.create_node(&mut self.tx, labels, props).await
    }

    pub async fn add_vertex_with_id(
        &mut self,
        id: NodeId,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        self.graph.preflight.check_vertex_id(IdKind::Numeric)?;
        self.graph.preflight.check_vertex_properties(&props)?;
        self.graph.backend.create_node_with_id(&mut self.tx, id, labels, props).await
    }

    pub async fn set_vertex_property(&mut self, id: NodeId, key: &str, value: Value) -> Result<()> {
        self.graph.preflight.check_vertex_property(&value)?;
        self.graph.backend.set_node_property(&mut self.tx, id, key, value).await
    }

    pub async fn add_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        self.graph.preflight.check_edge_properties(&props)?;
        self.graph.backend.create_relationship(&mut self.tx, src, dst, rel_type, props).await
    }

    pub async fn add_edge_with_id(
        &mut self,
        id: RelId,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        self.graph.preflight.check_edge_id(IdKind::Numeric)?;
        self.graph.preflight.check_edge_properties(&props)?;
        self.graph.backend
            .create_relationship_with_id(&mut self.tx, id, src, dst, rel_type, props)
            .await
    }

    pub async fn set_edge_property(&mut self, id: RelId, key: &str, value: Value) -> Result<()> {
        self.graph.preflight.check_edge_property(&value)?;
        self.graph.backend.set_relationship_property(&mut self.tx, id, key, value).await
    }

    pub async fn vertex(&self, id: NodeId) -> Result<Option<Node>> {
        self.graph.backend.get_node(&self.tx, id).await
    }

    pub async fn edge(&self, id: RelId) -> Result<Option<Relationship>> {
        self.graph.backend.get_relationship(&self.tx, id).await
    }

    pub async fn commit(self) -> Result<()> {
        self.graph.backend.commit_tx(self.tx).await
    }

    pub async fn rollback(self) -> Result<()> {
        self.graph.backend.rollback_tx(self.tx).await
    }

    /// Commit on `Ok`, roll back on `Err`, and pass the result through.
    async fn finish<T>(self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(e) => {
                self.rollback().await?;
                Err(e)
            }
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The active capability profile answers `false` for this operation.
    #[error("{feature} not supported for {domain} by this configuration")]
    Unsupported { domain: FeatureDomain, feature: &'static str },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
