//! # Capability Profiles
//!
//! What the engine supports, precomputed and read-only. Upstream layers
//! (validation, planners, conformance suites) consult the profile before
//! attempting an operation instead of trying it and catching the failure.
//!
//! The active backend contributes exactly one bit, whether it persists data,
//! and [`resolve_profile`] maps that bit to one of two shared profiles:
//!
//! | Backend reports | Profile | `graph().persists()` |
//! |-----------------|---------|----------------------|
//! | persistence     | persistent | `true` |
//! | no persistence  | transient  | `false` |
//!
//! Every other answer is identical between the two.

pub mod descriptors;
pub mod flags;
pub mod profile;

pub use descriptors::{
    DataTypeCapabilities, IdentifierCapabilities,
    GraphCapabilities, VertexCapabilities, VertexPropertyCapabilities,
    EdgeCapabilities, EdgePropertyCapabilities,
};
pub use flags::{FeatureDomain, FeatureFlag};
pub use profile::{CapabilityProfile, resolve_profile};
