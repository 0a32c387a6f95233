//! # Visibility Transition Engine
//!
//! Derives the subscription event kind from a blog's visibility change.
//!
//! Visibility is solely the `published` boolean; the engine is a pure
//! function of (previous state or absence, next state or absence).
//! Subscribers only ever observe a lifecycle consistent with "published
//! blogs exist, unpublished blogs don't": an unpublished blog being
//! deleted produces no event because subscribers never knew it existed,
//! and a published blog becoming unpublished is, to a subscriber,
//! indistinguishable from deletion.

use crate::MutationKind;

/// The VisibilityEngine computes blog subscription events.
pub struct VisibilityEngine;

impl VisibilityEngine {
    /// Compute the event kind for a visibility transition.
    ///
    /// `None` means the record is absent — before a create or after a
    /// delete. Returns `None` when no event must be emitted.
    ///
    /// | previous | next  | event   |
    /// |----------|-------|---------|
    /// | absent   | true  | Created |
    /// | absent   | false | —       |
    /// | true     | false | Deleted |
    /// | false    | true  | Created |
    /// | true     | true  | Updated |
    /// | false    | false | —       |
    /// | true     | absent| Deleted |
    /// | false    | absent| —       |
    #[must_use]
    pub const fn transition(previous: Option<bool>, next: Option<bool>) -> Option<MutationKind> {
        match (previous, next) {
            (None | Some(false), Some(true)) => Some(MutationKind::Created),
            (Some(true), Some(true)) => Some(MutationKind::Updated),
            (Some(true), Some(false) | None) => Some(MutationKind::Deleted),
            (None | Some(false), Some(false) | None) => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
