//! # Identity Generation
//!
//! The [`IdSource`] trait is the seam between the deterministic core and
//! whatever id scheme the embedding application prefers. The core calls
//! `next_id()` exactly once per created record; any collision-free source
//! satisfies the contract.
//!
//! This crate ships only the deterministic [`SequentialIds`] source.
//! Random schemes (uuid and friends) belong to the app layer — the core
//! stays free of randomness.

// =============================================================================
// ID SOURCE TRAIT
// =============================================================================

/// A source of globally unique record ids.
///
/// # Extension Point
///
/// Implementors must guarantee that no two calls on the same source return
/// equal strings. Implementations are expected to be cheap; `next_id` is
/// called inside the mutation critical section.
pub trait IdSource: Send + Sync {
    /// Produce the next unique id.
    fn next_id(&mut self) -> String;
}

// =============================================================================
// SEQUENTIAL IDS
// =============================================================================

/// Deterministic counter-backed id source.
///
/// Produces `"1"`, `"2"`, `"3"`, ... — used by tests and by
/// [`Session::new`](crate::session::Session::new).
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Create a new source starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next = self.next.saturating_add(1);
        self.next.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
