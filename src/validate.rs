//! Pre-flight checks against a capability profile.
//!
//! The profile only *describes*; this module is the caller side that turns a
//! `false` answer into [`Error::Unsupported`] before the backend is touched.

use crate::capability::flags::{
    ANY_IDS, MAP_VALUES, MIXED_LIST_VALUES, NUMERIC_IDS, SERIALIZABLE_VALUES,
    TRANSACTIONS, UNIFORM_LIST_VALUES, USER_SUPPLIED_IDS, UUID_IDS,
};
use crate::capability::{CapabilityProfile, DataTypeCapabilities, FeatureDomain, IdentifierCapabilities};
use crate::model::{PropertyMap, Value, ValueShape};
use crate::{Error, Result};

/// The kind of identifier a caller wants to supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Numeric,
    Uuid,
    /// Any other caller-chosen id type.
    Any,
}

/// Checks operations against one profile.
#[derive(Debug, Clone, Copy)]
pub struct Preflight {
    profile: &'static CapabilityProfile,
}

impl Preflight {
    pub fn new(profile: &'static CapabilityProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'static CapabilityProfile {
        self.profile
    }

    pub fn check_transactions(&self) -> Result<()> {
        if self.profile.graph().supports_transactions() {
            Ok(())
        } else {
            Err(unsupported(FeatureDomain::Graph, TRANSACTIONS))
        }
    }

    pub fn check_vertex_id(&self, kind: IdKind) -> Result<()> {
        check_id(FeatureDomain::Vertex, self.profile.vertex().ids(), kind)
    }

    pub fn check_edge_id(&self, kind: IdKind) -> Result<()> {
        check_id(FeatureDomain::Edge, self.profile.edge().ids(), kind)
    }

    pub fn check_vertex_property(&self, value: &Value) -> Result<()> {
        let caps = self.profile.vertex().properties().data_types();
        check_value(FeatureDomain::VertexProperty, caps, value)
    }

    pub fn check_vertex_properties(&self, props: &PropertyMap) -> Result<()> {
        props.values().try_for_each(|v| self.check_vertex_property(v))
    }

    pub fn check_edge_property(&self, value: &Value) -> Result<()> {
        let caps = self.profile.edge().properties().data_types();
        check_value(FeatureDomain::EdgeProperty, caps, value)
    }

    pub fn check_edge_properties(&self, props: &PropertyMap) -> Result<()> {
        props.values().try_for_each(|v| self.check_edge_property(v))
    }

    pub fn check_variable(&self, value: &Value) -> Result<()> {
        check_value(FeatureDomain::Variables, self.profile.graph().variables(), value)
    }
}

fn unsupported(domain: FeatureDomain, feature: &'static str) -> Error {
    tracing::warn!(%domain, feature, "rejected operation unsupported by capability profile");
    Error::Unsupported { domain, feature }
}

fn check_id(domain: FeatureDomain, caps: &IdentifierCapabilities, kind: IdKind) -> Result<()> {
    if !caps.supports_user_supplied_ids() {
        return Err(unsupported(domain, USER_SUPPLIED_IDS));
    }
    let (supported, feature) = match kind {
        IdKind::Numeric => (caps.supports_numeric_ids(), NUMERIC_IDS),
        IdKind::Uuid => (caps.supports_uuid_ids(), UUID_IDS),
        IdKind::Any => (caps.supports_any_ids(), ANY_IDS),
    };
    if supported { Ok(()) } else { Err(unsupported(domain, feature)) }
}

fn check_value(domain: FeatureDomain, caps: &DataTypeCapabilities, value: &Value) -> Result<()> {
    let (supported, feature) = match value.shape() {
        ValueShape::Scalar => return Ok(()),
        ValueShape::UniformList => (caps.supports_uniform_list_values(), UNIFORM_LIST_VALUES),
        ValueShape::MixedList => (caps.supports_mixed_list_values(), MIXED_LIST_VALUES),
        ValueShape::Map => (caps.supports_map_values(), MAP_VALUES),
        ValueShape::Serializable => (caps.supports_serializable_values(), SERIALIZABLE_VALUES),
    };
    if supported { Ok(()) } else { Err(unsupported(domain, feature)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::resolve_profile;
    use crate::model::props;

    fn assert_unsupported(result: Result<()>, domain: FeatureDomain, feature: &str) {
        match result {
            Err(Error::Unsupported { domain: d, feature: f }) => {
                assert_eq!((d, f), (domain, feature));
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_transactions_allowed() {
        for p in [true, false] {
            assert!(Preflight::new(resolve_profile(p)).check_transactions().is_ok());
        }
    }

    #[test]
    fn test_user_supplied_ids_rejected_first() {
        let pf = Preflight::new(resolve_profile(true));
        for kind in [IdKind::Numeric, IdKind::Uuid, IdKind::Any] {
            assert_unsupported(pf.check_vertex_id(kind), FeatureDomain::Vertex, USER_SUPPLIED_IDS);
            assert_unsupported(pf.check_edge_id(kind), FeatureDomain::Edge, USER_SUPPLIED_IDS);
        }
    }

    #[test]
    fn test_id_kinds_under_contract_default() {
        let caps = IdentifierCapabilities::CONTRACT_DEFAULT;
        for kind in [IdKind::Numeric, IdKind::Uuid, IdKind::Any] {
            assert!(check_id(FeatureDomain::EdgeProperty, &caps, kind).is_ok());
        }
    }

    #[test]
    fn test_scalars_pass_everywhere() {
        let pf = Preflight::new(resolve_profile(false));
        for v in [Value::Null, Value::from(1), Value::from("x"), Value::from(2.5), Value::from(true)] {
            assert!(pf.check_vertex_property(&v).is_ok());
            assert!(pf.check_edge_property(&v).is_ok());
            assert!(pf.check_variable(&v).is_ok());
        }
    }

    #[test]
    fn test_composites_rejected_with_matching_flag() {
        let pf = Preflight::new(resolve_profile(false));
        assert_unsupported(
            pf.check_vertex_property(&Value::from(vec![1, 2])),
            FeatureDomain::VertexProperty,
            UNIFORM_LIST_VALUES,
        );
        assert_unsupported(
            pf.check_edge_property(&Value::List(vec![Value::from(1), Value::from("a")])),
            FeatureDomain::EdgeProperty,
            MIXED_LIST_VALUES,
        );
        assert_unsupported(
            pf.check_variable(&Value::Map(props([("k", 1)]))),
            FeatureDomain::Variables,
            MAP_VALUES,
        );
        assert_unsupported(
            pf.check_variable(&Value::Bytes(vec![0])),
            FeatureDomain::Variables,
            SERIALIZABLE_VALUES,
        );
    }

    #[test]
    fn test_property_maps() {
        let pf = Preflight::new(resolve_profile(true));
        assert!(pf.check_vertex_properties(&props([("name", "Ada"), ("born", "1815")])).is_ok());

        let mut bad = props([("name", "Ada")]);
        bad.insert("tags".into(), Value::from(vec!["a", "b"]));
        assert!(pf.check_edge_properties(&bad).is_err());
    }
}
