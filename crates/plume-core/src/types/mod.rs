//! # Core Type Definitions
//!
//! This module contains all core types for the Plume mutation layer:
//! - Record identifiers (`UserId`, `BlogId`, `CommentId`)
//! - Entity records (`User`, `Blog`, `Comment`)
//! - Create payloads (`UserDraft`, `BlogDraft`, `CommentDraft`)
//! - Partial updates (`UserPatch`, `BlogPatch`, `CommentPatch`)
//! - Subscription event kinds (`MutationKind`)
//! - Error types (`PlumeError`)
//!
//! ## Partial-Update Semantics
//!
//! Patch types carry every field as `Option<T>`: `None` means "leave the
//! field unchanged", `Some(v)` means "set the field to `v`". This makes
//! "field present vs absent" explicit in the type, matching the dynamic
//! partial-update objects of the wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Unique identifier for a user record.
///
/// Ids are opaque strings produced by an [`IdSource`](crate::ident::IdSource);
/// any collision-free source satisfies the contract.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a blog record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlogId(pub String);

/// Unique identifier for a comment record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(pub String);

macro_rules! id_impl {
    ($name:ident) => {
        impl $name {
            /// Create a new id from a string.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_impl!(UserId);
id_impl!(BlogId);
id_impl!(CommentId);

// =============================================================================
// ENTITY RECORDS
// =============================================================================

/// A user record.
///
/// `email` is unique across all users; uniqueness is enforced by the
/// mutation engine on create and on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// A blog record.
///
/// `author` must reference an existing [`User`] at creation time.
/// `published` is the sole visibility state driving subscription events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: UserId,
}

/// A comment record.
///
/// At creation time `author` must exist and `blog` must exist and be
/// published. The invariant is creation-time only: a comment stays
/// attached to a blog that is later unpublished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: UserId,
    pub blog: BlogId,
}

// =============================================================================
// CREATE PAYLOADS
// =============================================================================

/// Payload for creating a user. The id is assigned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// Payload for creating a blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: UserId,
}

/// Payload for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub text: String,
    pub author: UserId,
    pub blog: BlogId,
}

// =============================================================================
// PARTIAL UPDATES
// =============================================================================

/// Partial update for a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

/// Partial update for a blog. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

/// Partial update for a comment. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentPatch {
    pub text: Option<String>,
}

// =============================================================================
// MUTATION KIND
// =============================================================================

/// The event kind carried by a subscription notification.
///
/// For blogs the kind is derived from the visibility transition, not the
/// raw store operation: an unpublish is reported as `Deleted` even though
/// the record still exists, because to a subscriber an unpublished blog
/// is indistinguishable from a deleted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the mutation layer.
///
/// All errors are synchronous and non-retryable: a mutation either fully
/// succeeds (store updated, notifications sent) or fails before any store
/// mutation occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlumeError {
    /// The email is already in use by another user.
    #[error("email already in use")]
    DuplicateEmail,

    /// The requested user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The requested blog does not exist.
    #[error("blog not found: {0}")]
    BlogNotFound(BlogId),

    /// The requested comment does not exist.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// A blog or comment creation referenced a nonexistent user.
    #[error("invalid user reference: {0}")]
    InvalidUserRef(UserId),

    /// A comment creation referenced a nonexistent or unpublished blog.
    #[error("invalid blog reference: {0}")]
    InvalidBlogRef(BlogId),
}

// =============================================================================
// TESTS
// =============================================================================
