//! UUID-backed id source for production use.
//!
//! The core stays free of randomness; the binary injects this source,
//! which produces time-ordered v7 uuids so record ids sort roughly by
//! creation time.

use plume_core::IdSource;

/// Id source producing uuid v7 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl UuidIds {
    /// Create a new source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::now_v7().to_string()
    }
}
