//! # plume-core
//!
//! The mutation core for Plume - THE LOGIC.
//!
//! This crate implements the mutation layer of a small social-content
//! domain (users, blogs, comments) backed by an in-memory collection
//! store: the referential-integrity cascade engine and the
//! publish/subscribe visibility-transition engine, plus the traits the
//! app layer plugs its collaborators into.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where the store exists (stateful)
//! - Is pure Rust: no async, no network dependencies, no randomness
//! - Requires the caller to serialize mutations (single logical owner)
//! - Publishes fire-and-forget: delivery never affects a mutation result

// =============================================================================
// MODULES
// =============================================================================

pub mod bus;
pub mod ident;
pub mod integrity;
pub mod mutation;
pub mod session;
pub mod store;
pub mod types;
pub mod visibility;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Blog, BlogDraft, BlogId, BlogPatch, Comment, CommentDraft, CommentId, CommentPatch,
    MutationKind, PlumeError, User, UserDraft, UserId, UserPatch,
};

// =============================================================================
// RE-EXPORTS: Engines and Collaborators
// =============================================================================

pub use bus::{Event, MemoryBus, NotificationBus, Topic};
pub use ident::{IdSource, SequentialIds};
pub use integrity::IntegrityEngine;
pub use mutation::MutationEngine;
pub use session::{SeedData, Session};
pub use store::Store;
pub use visibility::VisibilityEngine;
