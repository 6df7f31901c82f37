//! Profile selection.
//!
//! Exactly two profiles exist for the lifetime of the process. Both are
//! `static` items built by `const fn`, so they are fully constructed before
//! any thread runs and every caller shares the same instance.

use serde::Serialize;

use crate::storage::StoreFeatures;
use super::descriptors::{EdgeCapabilities, GraphCapabilities, VertexCapabilities};

/// The complete capability answer for one persistence mode.
///
/// Not `Clone`: the only instances are [`resolve_profile`]'s two statics,
/// so comparing profiles with [`std::ptr::eq`] is meaningful.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CapabilityProfile {
    graph: GraphCapabilities,
    vertex: VertexCapabilities,
    edge: EdgeCapabilities,
}

impl CapabilityProfile {
    const fn new(persists: bool) -> Self {
        Self {
            graph: GraphCapabilities::new(persists),
            vertex: VertexCapabilities::new(),
            edge: EdgeCapabilities::new(),
        }
    }

    pub const fn graph(&self) -> &GraphCapabilities { &self.graph }
    pub const fn vertex(&self) -> &VertexCapabilities { &self.vertex }
    pub const fn edge(&self) -> &EdgeCapabilities { &self.edge }

    /// Shorthand for `graph().persists()`.
    pub const fn persists(&self) -> bool { self.graph.persists() }

    /// The profile for a backend's reported feature set. Only
    /// `supports_persistence` is consulted.
    pub fn for_store(features: &StoreFeatures) -> &'static Self {
        resolve_profile(features.supports_persistence)
    }
}

static PERSISTENT: CapabilityProfile = CapabilityProfile::new(true);
static TRANSIENT: CapabilityProfile = CapabilityProfile::new(false);

/// Map the backend's persistence signal to the shared profile.
///
/// Total over `bool` and identity-stable: the same input always returns the
/// same `&'static` instance.
pub fn resolve_profile(backend_supports_persistence: bool) -> &'static CapabilityProfile {
    if backend_supports_persistence { &PERSISTENT } else { &TRANSIENT }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_persistent_scenario() {
        let p = resolve_profile(true);
        assert!(p.graph().persists());
        assert!(!p.vertex().supports_user_supplied_ids());
    }

    #[test]
    fn test_transient_scenario() {
        let p = resolve_profile(false);
        assert!(!p.graph().persists());
        assert!(!p.edge().properties().supports_map_values());
    }

    #[test]
    fn test_modes_resolve_to_distinct_instances() {
        assert!(!std::ptr::eq(resolve_profile(true), resolve_profile(false)));
        assert_ne!(resolve_profile(true), resolve_profile(false));
    }

    #[test]
    fn test_only_persists_differs() {
        let persistent = resolve_profile(true);
        let transient = resolve_profile(false);
        assert_eq!(persistent.vertex(), transient.vertex());
        assert_eq!(persistent.edge(), transient.edge());
        assert_eq!(persistent.graph().variables(), transient.graph().variables());
        assert_eq!(
            persistent.graph().supports_computer(),
            transient.graph().supports_computer()
        );
        assert_eq!(
            persistent.graph().supports_transactions(),
            transient.graph().supports_transactions()
        );
        assert_eq!(
            persistent.graph().supports_threaded_transactions(),
            transient.graph().supports_threaded_transactions()
        );
    }

    #[test]
    fn test_for_store_uses_persistence_bit() {
        let durable = StoreFeatures { supports_persistence: true };
        let volatile = StoreFeatures { supports_persistence: false };
        assert!(std::ptr::eq(CapabilityProfile::for_store(&durable), resolve_profile(true)));
        assert!(std::ptr::eq(CapabilityProfile::for_store(&volatile), resolve_profile(false)));
    }

    proptest! {
        #[test]
        fn prop_resolve_is_identity_stable(p in any::<bool>()) {
            prop_assert!(std::ptr::eq(resolve_profile(p), resolve_profile(p)));
            prop_assert_eq!(resolve_profile(p).persists(), p);
        }

        #[test]
        fn prop_structural_flags_hold(p in any::<bool>()) {
            let g = resolve_profile(p).graph();
            prop_assert!(g.supports_computer());
            prop_assert!(g.supports_transactions());
            prop_assert!(g.supports_threaded_transactions());
        }
    }
}
