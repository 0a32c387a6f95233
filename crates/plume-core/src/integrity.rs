//! # Integrity Engine
//!
//! Maintains referential consistency when a user or blog is deleted:
//! computes and applies the full transitive set of dependent records
//! that must also be removed.
//!
//! Global invariant after every mutation: no comment references a dead
//! blog or dead user, and no blog references a dead user. The invariant
//! is enforced here, at the moment of deletion, and is never re-checked
//! retroactively elsewhere.

use crate::store::Store;
use crate::{Blog, BlogId, PlumeError, User, UserId};

/// The IntegrityEngine applies delete cascades to the store.
pub struct IntegrityEngine;

impl IntegrityEngine {
    /// Delete a user and cascade to dependent records.
    ///
    /// 1. Remove the user, or fail with `UserNotFound`.
    /// 2. Remove every blog authored by the user.
    /// 3. Remove every comment on a removed blog — computed against the
    ///    pre-deletion blog set.
    /// 4. Remove every remaining comment authored by the user (covers
    ///    comments the user made on other authors' blogs).
    ///
    /// A comment matched by both cascade paths is removed exactly once;
    /// the net effect is idempotent. Returns the deleted user.
    pub fn delete_user(store: &mut Store, id: &UserId) -> Result<User, PlumeError> {
        let user = store
            .remove_user(id)
            .ok_or_else(|| PlumeError::UserNotFound(id.clone()))?;

        let removed_blogs = store.remove_blogs_by_author(id);
        for blog in &removed_blogs {
            store.remove_comments_on_blog(&blog.id);
        }
        store.remove_comments_by_author(id);

        Ok(user)
    }

    /// Delete a blog and cascade to its comments.
    ///
    /// Comments are removed regardless of the blog's published state.
    /// Returns the deleted blog; its `published` field is the
    /// pre-deletion visibility that drives the subscription event.
    pub fn delete_blog(store: &mut Store, id: &BlogId) -> Result<Blog, PlumeError> {
        let blog = store
            .remove_blog(id)
            .ok_or_else(|| PlumeError::BlogNotFound(id.clone()))?;

        store.remove_comments_on_blog(id);

        Ok(blog)
    }
}

// =============================================================================
// TESTS
// =============================================================================
