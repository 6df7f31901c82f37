//! Capability descriptors — the immutable answer tree behind a profile.
//!
//! Every descriptor is a plain `Copy` value with private fields and `const`
//! accessors. There is no setter anywhere: a backend family that needs a
//! different answer gets a new descriptor constant, not a mutation path.
//!
//! ```text
//! CapabilityProfile
//! ├── GraphCapabilities ── variables: DataTypeCapabilities
//! ├── VertexCapabilities ─ properties: VertexPropertyCapabilities
//! └── EdgeCapabilities ─── properties: EdgePropertyCapabilities
//! ```

use serde::Serialize;

// ============================================================================
// Data types
// ============================================================================

/// What richness of value a container (graph variables, a property) accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DataTypeCapabilities {
    supports_map_values: bool,
    supports_mixed_list_values: bool,
    supports_uniform_list_values: bool,
    supports_serializable_values: bool,
}

impl DataTypeCapabilities {
    /// Scalars only: no maps, no lists of any kind, no opaque blobs.
    ///
    /// This is the one data-type answer of this engine and is embedded,
    /// unmodified, in graph variables, vertex properties and edge properties.
    pub const SCALAR_ONLY: Self = Self {
        supports_map_values: false,
        supports_mixed_list_values: false,
        supports_uniform_list_values: false,
        supports_serializable_values: false,
    };

    pub const fn supports_map_values(&self) -> bool { self.supports_map_values }

    /// Heterogeneously-typed sequences.
    pub const fn supports_mixed_list_values(&self) -> bool { self.supports_mixed_list_values }

    /// Homogeneously-typed sequences.
    pub const fn supports_uniform_list_values(&self) -> bool { self.supports_uniform_list_values }

    /// Opaque blob values.
    pub const fn supports_serializable_values(&self) -> bool { self.supports_serializable_values }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Which identifier kinds a vertex, edge or property may be created with.
///
/// Invariant: when `supports_user_supplied_ids` is false, `supports_any_ids`
/// and `supports_uuid_ids` are false too. Both constants below satisfy it;
/// see [`IdentifierCapabilities::is_consistent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IdentifierCapabilities {
    supports_user_supplied_ids: bool,
    supports_numeric_ids: bool,
    supports_any_ids: bool,
    supports_uuid_ids: bool,
}

impl IdentifierCapabilities {
    /// Only engine-assigned identifiers are accepted.
    pub const ENGINE_ASSIGNED: Self = Self {
        supports_user_supplied_ids: false,
        supports_numeric_ids: false,
        supports_any_ids: false,
        supports_uuid_ids: false,
    };

    /// The answer the generic capability contract gives when a descriptor
    /// does not override its identifier flags: every identifier kind is
    /// reported as accepted.
    ///
    /// Only edge properties carry this value. Edge properties are not
    /// addressable the way vertex properties are, so their identifier
    /// answers were left at the contract default instead of being forced to
    /// `false`. Whether that should stay so is still open; keep the two
    /// property domains distinct until it is settled.
    pub const CONTRACT_DEFAULT: Self = Self {
        supports_user_supplied_ids: true,
        supports_numeric_ids: true,
        supports_any_ids: true,
        supports_uuid_ids: true,
    };

    pub const fn supports_user_supplied_ids(&self) -> bool { self.supports_user_supplied_ids }
    pub const fn supports_numeric_ids(&self) -> bool { self.supports_numeric_ids }
    pub const fn supports_any_ids(&self) -> bool { self.supports_any_ids }
    pub const fn supports_uuid_ids(&self) -> bool { self.supports_uuid_ids }

    /// A backend cannot accept supplied UUID or arbitrary ids while refusing
    /// user-supplied ids in general.
    pub const fn is_consistent(&self) -> bool {
        self.supports_user_supplied_ids || !(self.supports_any_ids || self.supports_uuid_ids)
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Graph-level answers. `persists` is the only value that differs between
/// the persistent and the transient profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GraphCapabilities {
    persists: bool,
    supports_computer: bool,
    supports_transactions: bool,
    supports_threaded_transactions: bool,
    variables: DataTypeCapabilities,
}

impl GraphCapabilities {
    pub(crate) const fn new(persists: bool) -> Self {
        Self {
            persists,
            supports_computer: true,
            supports_transactions: true,
            supports_threaded_transactions: true,
            variables: DataTypeCapabilities::SCALAR_ONLY,
        }
    }

    /// Whether the backend durably stores the graph.
    pub const fn persists(&self) -> bool { self.persists }

    /// An external parallel-computation pass over the graph is always available.
    pub const fn supports_computer(&self) -> bool { self.supports_computer }

    pub const fn supports_transactions(&self) -> bool { self.supports_transactions }

    /// A transaction may be used from threads other than the one that began it.
    pub const fn supports_threaded_transactions(&self) -> bool { self.supports_threaded_transactions }

    /// Graph-scoped variable storage.
    pub const fn variables(&self) -> &DataTypeCapabilities { &self.variables }
}

// ============================================================================
// Vertices
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VertexCapabilities {
    ids: IdentifierCapabilities,
    properties: VertexPropertyCapabilities,
}

impl VertexCapabilities {
    pub(crate) const fn new() -> Self {
        Self {
            // All four flags off. Numeric vertex ids were historically left at
            // the contract default rather than overridden; they are forced off
            // here with the other three, unlike the edge-property ids.
            ids: IdentifierCapabilities::ENGINE_ASSIGNED,
            properties: VertexPropertyCapabilities::new(),
        }
    }

    pub const fn ids(&self) -> &IdentifierCapabilities { &self.ids }
    pub const fn supports_user_supplied_ids(&self) -> bool { self.ids.supports_user_supplied_ids() }
    pub const fn supports_numeric_ids(&self) -> bool { self.ids.supports_numeric_ids() }
    pub const fn supports_any_ids(&self) -> bool { self.ids.supports_any_ids() }
    pub const fn supports_uuid_ids(&self) -> bool { self.ids.supports_uuid_ids() }

    pub const fn properties(&self) -> &VertexPropertyCapabilities { &self.properties }
}

/// Vertex properties are addressable, but only through synthetic ids the
/// engine assigns, so every identifier flag is forced off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VertexPropertyCapabilities {
    data_types: DataTypeCapabilities,
    ids: IdentifierCapabilities,
}

impl VertexPropertyCapabilities {
    const fn new() -> Self {
        Self {
            data_types: DataTypeCapabilities::SCALAR_ONLY,
            ids: IdentifierCapabilities::ENGINE_ASSIGNED,
        }
    }

    pub const fn data_types(&self) -> &DataTypeCapabilities { &self.data_types }
    pub const fn supports_map_values(&self) -> bool { self.data_types.supports_map_values() }
    pub const fn supports_mixed_list_values(&self) -> bool { self.data_types.supports_mixed_list_values() }
    pub const fn supports_uniform_list_values(&self) -> bool { self.data_types.supports_uniform_list_values() }
    pub const fn supports_serializable_values(&self) -> bool { self.data_types.supports_serializable_values() }

    pub const fn ids(&self) -> &IdentifierCapabilities { &self.ids }
    pub const fn supports_user_supplied_ids(&self) -> bool { self.ids.supports_user_supplied_ids() }
    pub const fn supports_numeric_ids(&self) -> bool { self.ids.supports_numeric_ids() }
    pub const fn supports_any_ids(&self) -> bool { self.ids.supports_any_ids() }
    pub const fn supports_uuid_ids(&self) -> bool { self.ids.supports_uuid_ids() }
}

// ============================================================================
// Edges
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeCapabilities {
    ids: IdentifierCapabilities,
    properties: EdgePropertyCapabilities,
}

impl EdgeCapabilities {
    pub(crate) const fn new() -> Self {
        Self {
            ids: IdentifierCapabilities::ENGINE_ASSIGNED,
            properties: EdgePropertyCapabilities::new(),
        }
    }

    pub const fn ids(&self) -> &IdentifierCapabilities { &self.ids }
    pub const fn supports_user_supplied_ids(&self) -> bool { self.ids.supports_user_supplied_ids() }
    pub const fn supports_numeric_ids(&self) -> bool { self.ids.supports_numeric_ids() }
    pub const fn supports_any_ids(&self) -> bool { self.ids.supports_any_ids() }
    pub const fn supports_uuid_ids(&self) -> bool { self.ids.supports_uuid_ids() }

    pub const fn properties(&self) -> &EdgePropertyCapabilities { &self.properties }
}

/// Edge properties override none of the identifier flags; they report
/// [`IdentifierCapabilities::CONTRACT_DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgePropertyCapabilities {
    data_types: DataTypeCapabilities,
    ids: IdentifierCapabilities,
}

impl EdgePropertyCapabilities {
    const fn new() -> Self {
        Self {
            data_types: DataTypeCapabilities::SCALAR_ONLY,
            ids: IdentifierCapabilities::CONTRACT_DEFAULT,
        }
    }

    pub const fn data_types(&self) -> &DataTypeCapabilities { &self.data_types }
    pub const fn supports_map_values(&self) -> bool { self.data_types.supports_map_values() }
    pub const fn supports_mixed_list_values(&self) -> bool { self.data_types.supports_mixed_list_values() }
    pub const fn supports_uniform_list_values(&self) -> bool { self.data_types.supports_uniform_list_values() }
    pub const fn supports_serializable_values(&self) -> bool { self.data_types.supports_serializable_values() }

    pub const fn ids(&self) -> &IdentifierCapabilities { &self.ids }
    pub const fn supports_user_supplied_ids(&self) -> bool { self.ids.supports_user_supplied_ids() }
    pub const fn supports_numeric_ids(&self) -> bool { self.ids.supports_numeric_ids() }
    pub const fn supports_any_ids(&self) -> bool { self.ids.supports_any_ids() }
    pub const fn supports_uuid_ids(&self) -> bool { self.ids.supports_uuid_ids() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_only_rejects_every_composite() {
        let dt = DataTypeCapabilities::SCALAR_ONLY;
        assert!(!dt.supports_map_values());
        assert!(!dt.supports_mixed_list_values());
        assert!(!dt.supports_uniform_list_values());
        assert!(!dt.supports_serializable_values());
    }

    #[test]
    fn test_identifier_constants_are_consistent() {
        assert!(IdentifierCapabilities::ENGINE_ASSIGNED.is_consistent());
        assert!(IdentifierCapabilities::CONTRACT_DEFAULT.is_consistent());
    }

    #[test]
    fn test_uuid_without_user_supplied_is_inconsistent() {
        let bad = IdentifierCapabilities {
            supports_user_supplied_ids: false,
            supports_numeric_ids: false,
            supports_any_ids: false,
            supports_uuid_ids: true,
        };
        assert!(!bad.is_consistent());
    }

    #[test]
    fn test_vertex_and_edge_properties_differ_only_in_ids() {
        let vp = VertexCapabilities::new().properties;
        let ep = EdgeCapabilities::new().properties;
        assert_eq!(vp.data_types(), ep.data_types());
        assert_eq!(vp.ids(), &IdentifierCapabilities::ENGINE_ASSIGNED);
        assert_eq!(ep.ids(), &IdentifierCapabilities::CONTRACT_DEFAULT);
    }

    #[test]
    fn test_vertex_ids_all_engine_assigned() {
        let v = VertexCapabilities::new();
        assert!(!v.supports_numeric_ids());
        assert!(!v.supports_user_supplied_ids());
        assert!(!v.supports_any_ids());
        assert!(!v.supports_uuid_ids());
    }

    #[test]
    fn test_graph_structural_flags() {
        for persists in [true, false] {
            let g = GraphCapabilities::new(persists);
            assert_eq!(g.persists(), persists);
            assert!(g.supports_computer());
            assert!(g.supports_transactions());
            assert!(g.supports_threaded_transactions());
            assert_eq!(g.variables(), &DataTypeCapabilities::SCALAR_ONLY);
        }
    }
}
