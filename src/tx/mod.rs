//! Transaction handles.
//!
//! `Transaction` requires `Send + Sync`, so a handle can move to another
//! thread or task between operations. Writes take the handle by `&mut`, so
//! only one thread writes through it at a time. The profile's
//! `supports_threaded_transactions()` is a fixed answer of the descriptor
//! tree; nothing here derives it from the handle type.

use serde::{Deserialize, Serialize};

/// Transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

impl TxMode {
    pub fn is_writable(self) -> bool {
        matches!(self, TxMode::ReadWrite)
    }
}

/// Opaque transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub u64);

/// Transaction trait that all backends must implement.
pub trait Transaction: Send + Sync {
    fn mode(&self) -> TxMode;
    fn id(&self) -> TxId;
}
