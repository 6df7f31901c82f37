//! # Property Graph Model
//!
//! Plain data that crosses every boundary: backend ↔ graph handle ↔ caller.
//! No I/O, no state, no async.

pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId, Direction};
pub use value::{Value, ValueShape};
pub use property_map::{PropertyMap, props};
