//! Flat view of a profile for conformance harnesses.
//!
//! A harness deciding which parts of a shared test suite apply does not want
//! to walk the descriptor tree by hand. [`CapabilityProfile::flags`] lists
//! every answer in a fixed order, and the `Display` impl renders the same
//! list as the conventional feature listing:
//!
//! ```text
//! FEATURES
//! > GraphFeatures
//! >-- Computer: true
//! >-- Persistence: false
//! ...
//! ```

use std::fmt;

use serde::Serialize;

use super::descriptors::{DataTypeCapabilities, IdentifierCapabilities};
use super::profile::CapabilityProfile;

/// One node of the descriptor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureDomain {
    Graph,
    Variables,
    Vertex,
    VertexProperty,
    Edge,
    EdgeProperty,
}

impl FeatureDomain {
    pub const ALL: [FeatureDomain; 6] = [
        FeatureDomain::Graph,
        FeatureDomain::Variables,
        FeatureDomain::Vertex,
        FeatureDomain::VertexProperty,
        FeatureDomain::Edge,
        FeatureDomain::EdgeProperty,
    ];

    /// Section title used in the feature listing.
    pub const fn section(&self) -> &'static str {
        match self {
            FeatureDomain::Graph => "GraphFeatures",
            FeatureDomain::Variables => "VariableFeatures",
            FeatureDomain::Vertex => "VertexFeatures",
            FeatureDomain::VertexProperty => "VertexPropertyFeatures",
            FeatureDomain::Edge => "EdgeFeatures",
            FeatureDomain::EdgeProperty => "EdgePropertyFeatures",
        }
    }
}

impl fmt::Display for FeatureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureDomain::Graph => "graph",
            FeatureDomain::Variables => "graph variables",
            FeatureDomain::Vertex => "vertices",
            FeatureDomain::VertexProperty => "vertex properties",
            FeatureDomain::Edge => "edges",
            FeatureDomain::EdgeProperty => "edge properties",
        };
        f.write_str(name)
    }
}

/// A single capability answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureFlag {
    pub domain: FeatureDomain,
    pub name: &'static str,
    pub supported: bool,
}

// Flag names
pub const PERSISTENCE: &str = "Persistence";
pub const COMPUTER: &str = "Computer";
pub const TRANSACTIONS: &str = "Transactions";
pub const THREADED_TRANSACTIONS: &str = "ThreadedTransactions";
pub const MAP_VALUES: &str = "MapValues";
pub const MIXED_LIST_VALUES: &str = "MixedListValues";
pub const UNIFORM_LIST_VALUES: &str = "UniformListValues";
pub const SERIALIZABLE_VALUES: &str = "SerializableValues";
pub const USER_SUPPLIED_IDS: &str = "UserSuppliedIds";
pub const NUMERIC_IDS: &str = "NumericIds";
pub const ANY_IDS: &str = "AnyIds";
pub const UUID_IDS: &str = "UuidIds";

fn push(out: &mut Vec<FeatureFlag>, domain: FeatureDomain, name: &'static str, supported: bool) {
    out.push(FeatureFlag { domain, name, supported });
}

fn push_data_types(out: &mut Vec<FeatureFlag>, domain: FeatureDomain, dt: &DataTypeCapabilities) {
    push(out, domain, MAP_VALUES, dt.supports_map_values());
    push(out, domain, MIXED_LIST_VALUES, dt.supports_mixed_list_values());
    push(out, domain, SERIALIZABLE_VALUES, dt.supports_serializable_values());
    push(out, domain, UNIFORM_LIST_VALUES, dt.supports_uniform_list_values());
}

fn push_ids(out: &mut Vec<FeatureFlag>, domain: FeatureDomain, ids: &IdentifierCapabilities) {
    push(out, domain, ANY_IDS, ids.supports_any_ids());
    push(out, domain, NUMERIC_IDS, ids.supports_numeric_ids());
    push(out, domain, USER_SUPPLIED_IDS, ids.supports_user_supplied_ids());
    push(out, domain, UUID_IDS, ids.supports_uuid_ids());
}

impl CapabilityProfile {
    /// Every answer of this profile, grouped by domain in
    /// [`FeatureDomain::ALL`] order.
    pub fn flags(&self) -> Vec<FeatureFlag> {
        let mut out = Vec::with_capacity(32);

        let graph = self.graph();
        push(&mut out, FeatureDomain::Graph, COMPUTER, graph.supports_computer());
        push(&mut out, FeatureDomain::Graph, PERSISTENCE, graph.persists());
        push(&mut out, FeatureDomain::Graph, THREADED_TRANSACTIONS, graph.supports_threaded_transactions());
        push(&mut out, FeatureDomain::Graph, TRANSACTIONS, graph.supports_transactions());

        push_data_types(&mut out, FeatureDomain::Variables, graph.variables());

        let vertex = self.vertex();
        push_ids(&mut out, FeatureDomain::Vertex, vertex.ids());
        push_ids(&mut out, FeatureDomain::VertexProperty, vertex.properties().ids());
        push_data_types(&mut out, FeatureDomain::VertexProperty, vertex.properties().data_types());

        let edge = self.edge();
        push_ids(&mut out, FeatureDomain::Edge, edge.ids());
        push_ids(&mut out, FeatureDomain::EdgeProperty, edge.properties().ids());
        push_data_types(&mut out, FeatureDomain::EdgeProperty, edge.properties().data_types());

        out
    }

    /// Look up one answer by domain and flag name. `None` if the domain has
    /// no such flag.
    pub fn supports(&self, domain: FeatureDomain, name: &str) -> Option<bool> {
        self.flags()
            .into_iter()
            .find(|flag| flag.domain == domain && flag.name == name)
            .map(|flag| flag.supported)
    }

    /// The descriptor tree as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for CapabilityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FEATURES")?;
        let mut section = None;
        for flag in self.flags() {
            if section != Some(flag.domain) {
                write!(f, "\n> {}", flag.domain.section())?;
                section = Some(flag.domain);
            }
            write!(f, "\n>-- {}: {}", flag.name, flag.supported)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::resolve_profile;
    use pretty_assertions::assert_eq;

    const ID_FLAGS: [&str; 4] = [USER_SUPPLIED_IDS, NUMERIC_IDS, ANY_IDS, UUID_IDS];

    #[test]
    fn test_every_domain_is_listed() {
        let flags = resolve_profile(false).flags();
        for domain in FeatureDomain::ALL {
            assert!(flags.iter().any(|f| f.domain == domain), "{domain:?} missing");
        }
    }

    #[test]
    fn test_negative_defaults_except_edge_property_ids() {
        for p in [true, false] {
            for flag in resolve_profile(p).flags() {
                match (flag.domain, flag.name) {
                    (FeatureDomain::Graph, _) => continue,
                    (FeatureDomain::EdgeProperty, name) if ID_FLAGS.contains(&name) => continue,
                    _ => assert!(!flag.supported, "{:?}.{} should be false", flag.domain, flag.name),
                }
            }
        }
    }

    #[test]
    fn test_flag_lists_differ_only_in_persistence() {
        let persistent = resolve_profile(true).flags();
        let transient = resolve_profile(false).flags();
        assert_eq!(persistent.len(), transient.len());

        let diffs: Vec<_> = persistent
            .iter()
            .zip(&transient)
            .filter(|(a, b)| a != b)
            .map(|(a, _)| (a.domain, a.name))
            .collect();
        assert_eq!(diffs, vec![(FeatureDomain::Graph, PERSISTENCE)]);
    }

    #[test]
    fn test_supports_lookup() {
        let p = resolve_profile(true);
        assert_eq!(p.supports(FeatureDomain::Graph, PERSISTENCE), Some(true));
        assert_eq!(p.supports(FeatureDomain::Vertex, USER_SUPPLIED_IDS), Some(false));
        assert_eq!(p.supports(FeatureDomain::Variables, USER_SUPPLIED_IDS), None);
        assert_eq!(p.supports(FeatureDomain::Graph, "Nonsense"), None);
    }

    #[test]
    fn test_feature_listing() {
        let text = resolve_profile(false).to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("FEATURES"));
        assert_eq!(lines.next(), Some("> GraphFeatures"));
        assert_eq!(lines.next(), Some(">-- Computer: true"));
        assert_eq!(lines.next(), Some(">-- Persistence: false"));
        assert!(text.contains("> EdgePropertyFeatures\n>-- AnyIds: true"));
        // one header per domain, one line per flag
        assert_eq!(text.lines().count(), 1 + FeatureDomain::ALL.len() + resolve_profile(false).flags().len());
    }

    #[test]
    fn test_json_export() {
        let json = resolve_profile(true).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["graph"]["persists"], serde_json::Value::Bool(true));
        assert_eq!(
            value["vertex"]["properties"]["data_types"]["supports_map_values"],
            serde_json::Value::Bool(false)
        );
    }
}
