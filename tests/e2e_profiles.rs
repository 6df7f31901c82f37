//! End-to-end tests for profile resolution through real graph handles.
//!
//! Each test opens a graph against a memory or snapshot backend and checks
//! which shared profile it resolved to.

use graph_features::storage::StorageBackend;
use graph_features::{
    BackendConfig, CapabilityProfile, FeatureDomain, Graph, MemoryBackend, resolve_profile,
};
use pretty_assertions::assert_eq;

fn snapshot_config(dir: &tempfile::TempDir) -> BackendConfig {
    BackendConfig::Snapshot { path: dir.path().join("graph.json"), sync_on_commit: true }
}

// ============================================================================
// 1. Backend signal → profile
// ============================================================================

#[tokio::test]
async fn test_memory_graph_is_transient() {
    let graph = Graph::open_memory().await.unwrap();
    assert!(!graph.features().graph().persists());
    assert!(std::ptr::eq(graph.features(), resolve_profile(false)));
}

#[tokio::test]
async fn test_snapshot_graph_is_persistent() {
    let dir = tempfile::tempdir().unwrap();
    let graph = Graph::open(&snapshot_config(&dir)).await.unwrap();
    assert!(graph.features().graph().persists());
    assert!(std::ptr::eq(graph.features(), resolve_profile(true)));
}

#[tokio::test]
async fn test_profile_matches_backend_report() {
    let dir = tempfile::tempdir().unwrap();
    for config in [BackendConfig::Memory, snapshot_config(&dir)] {
        let graph = Graph::open(&config).await.unwrap();
        let reported = graph.backend().store_features();
        assert!(std::ptr::eq(graph.features(), CapabilityProfile::for_store(&reported)));
    }
}

// ============================================================================
// 2. Shared instances
// ============================================================================

#[tokio::test]
async fn test_graphs_share_one_profile_per_mode() {
    let a = Graph::open_memory().await.unwrap();
    let b = Graph::open(&BackendConfig::Memory).await.unwrap();
    assert!(std::ptr::eq(a.features(), b.features()));

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let c = Graph::open(&snapshot_config(&dir_a)).await.unwrap();
    let d = Graph::open(&snapshot_config(&dir_b)).await.unwrap();
    assert!(std::ptr::eq(c.features(), d.features()));
    assert!(!std::ptr::eq(a.features(), c.features()));
}

#[test]
fn test_threads_observe_same_instances() {
    let addrs: Vec<(usize, usize)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    let graph = Graph::with_backend(MemoryBackend::new());
                    let transient = graph.features() as *const CapabilityProfile as usize;
                    let persistent = resolve_profile(true) as *const CapabilityProfile as usize;
                    (transient, persistent)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = addrs[0];
    assert!(addrs.iter().all(|a| *a == first));
    assert_eq!(first.0, resolve_profile(false) as *const CapabilityProfile as usize);
}

// ============================================================================
// 3. Conformance-harness view
// ============================================================================

#[tokio::test]
async fn test_harness_can_skip_by_flag() {
    let graph = Graph::open_memory().await.unwrap();
    let features = graph.features();

    let applicable: Vec<_> = features
        .flags()
        .into_iter()
        .filter(|f| f.supported)
        .map(|f| (f.domain, f.name))
        .collect();

    assert_eq!(
        applicable,
        vec![
            (FeatureDomain::Graph, "Computer"),
            (FeatureDomain::Graph, "ThreadedTransactions"),
            (FeatureDomain::Graph, "Transactions"),
            (FeatureDomain::EdgeProperty, "AnyIds"),
            (FeatureDomain::EdgeProperty, "NumericIds"),
            (FeatureDomain::EdgeProperty, "UserSuppliedIds"),
            (FeatureDomain::EdgeProperty, "UuidIds"),
        ]
    );
}

#[tokio::test]
async fn test_listing_reflects_mode() {
    let dir = tempfile::tempdir().unwrap();
    let durable = Graph::open(&snapshot_config(&dir)).await.unwrap();
    let volatile = Graph::open_memory().await.unwrap();

    assert!(durable.features().to_string().contains(">-- Persistence: true"));
    assert!(volatile.features().to_string().contains(">-- Persistence: false"));
}
