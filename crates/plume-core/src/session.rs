//! # Session Module
//!
//! The Session is the single entry point the app layer talks to: it owns
//! the store, the id source, and the notification bus, and exposes the
//! nine mutation operations plus read accessors.
//!
//! The Session itself carries no synchronization. The contract requires
//! the caller to serialize mutation invocations — the HTTP server wraps
//! the Session in an async lock so each mutation runs as one atomic
//! critical section.

use crate::bus::{MemoryBus, NotificationBus};
use crate::ident::{IdSource, SequentialIds};
use crate::mutation::MutationEngine;
use crate::store::Store;
use crate::{
    Blog, BlogDraft, BlogId, BlogPatch, Comment, CommentDraft, CommentId, CommentPatch,
    PlumeError, User, UserDraft, UserId, UserPatch,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// SEED DATA
// =============================================================================

/// Pre-built records loaded into a fresh session at startup.
///
/// Seed records carry explicit ids (they bypass the id source) and are
/// validated against the same invariants the mutation engine enforces:
/// unique emails, live author references, comments only on published
/// blogs. Seeding publishes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub blogs: Vec<Blog>,
    pub comments: Vec<Comment>,
}

// =============================================================================
// SESSION
// =============================================================================

/// Owns the store and its collaborators; one instance per process.
pub struct Session {
    store: Store,
    ids: Box<dyn IdSource>,
    bus: Arc<dyn NotificationBus>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with deterministic ids and a recording bus.
    ///
    /// This is the test wiring; the server injects its own collaborators
    /// via [`Session::with_parts`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(SequentialIds::new()),
            Arc::new(MemoryBus::new()),
        )
    }

    /// Create a session with injected id source and bus.
    #[must_use]
    pub fn with_parts(ids: Box<dyn IdSource>, bus: Arc<dyn NotificationBus>) -> Self {
        Self {
            store: Store::new(),
            ids,
            bus,
        }
    }

    /// Load seed records, validating referential invariants.
    ///
    /// The whole batch is validated before any record is stored: a
    /// failing seed leaves the store exactly as it was.
    pub fn seed(&mut self, data: SeedData) -> Result<(), PlumeError> {
        for (i, user) in data.users.iter().enumerate() {
            let duplicate = self.store.email_taken(&user.email)
                || data.users[..i].iter().any(|u| u.email == user.email);
            if duplicate {
                return Err(PlumeError::DuplicateEmail);
            }
        }

        let user_known = |id: &UserId| {
            self.store.user(id).is_some() || data.users.iter().any(|u| &u.id == id)
        };
        for blog in &data.blogs {
            if !user_known(&blog.author) {
                return Err(PlumeError::InvalidUserRef(blog.author.clone()));
            }
        }

        let blog_published = |id: &BlogId| {
            self.store
                .blog(id)
                .map(|b| b.published)
                .or_else(|| data.blogs.iter().find(|b| &b.id == id).map(|b| b.published))
        };
        for comment in &data.comments {
            if !user_known(&comment.author) {
                return Err(PlumeError::InvalidUserRef(comment.author.clone()));
            }
            if blog_published(&comment.blog) != Some(true) {
                return Err(PlumeError::InvalidBlogRef(comment.blog.clone()));
            }
        }

        for user in data.users {
            self.store.push_user(user);
        }
        for blog in data.blogs {
            self.store.push_blog(blog);
        }
        for comment in data.comments {
            self.store.push_comment(comment);
        }
        Ok(())
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Create a user.
    pub fn create_user(&mut self, draft: UserDraft) -> Result<User, PlumeError> {
        MutationEngine::create_user(&mut self.store, self.ids.as_mut(), draft)
    }

    /// Update a user (partial merge).
    pub fn update_user(&mut self, id: &UserId, patch: UserPatch) -> Result<User, PlumeError> {
        MutationEngine::update_user(&mut self.store, id, patch)
    }

    /// Delete a user and cascade.
    pub fn delete_user(&mut self, id: &UserId) -> Result<User, PlumeError> {
        MutationEngine::delete_user(&mut self.store, id)
    }

    /// Create a blog.
    pub fn create_blog(&mut self, draft: BlogDraft) -> Result<Blog, PlumeError> {
        MutationEngine::create_blog(&mut self.store, self.ids.as_mut(), self.bus.as_ref(), draft)
    }

    /// Update a blog (partial merge plus visibility event).
    pub fn update_blog(&mut self, id: &BlogId, patch: BlogPatch) -> Result<Blog, PlumeError> {
        MutationEngine::update_blog(&mut self.store, self.bus.as_ref(), id, patch)
    }

    /// Delete a blog and cascade.
    pub fn delete_blog(&mut self, id: &BlogId) -> Result<Blog, PlumeError> {
        MutationEngine::delete_blog(&mut self.store, self.bus.as_ref(), id)
    }

    /// Create a comment.
    pub fn create_comment(&mut self, draft: CommentDraft) -> Result<Comment, PlumeError> {
        MutationEngine::create_comment(&mut self.store, self.ids.as_mut(), self.bus.as_ref(), draft)
    }

    /// Update a comment.
    pub fn update_comment(
        &mut self,
        id: &CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, PlumeError> {
        MutationEngine::update_comment(&mut self.store, self.bus.as_ref(), id, patch)
    }

    /// Delete a comment.
    pub fn delete_comment(&mut self, id: &CommentId) -> Result<Comment, PlumeError> {
        MutationEngine::delete_comment(&mut self.store, self.bus.as_ref(), id)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// All users in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        self.store.users()
    }

    /// All blogs in insertion order.
    #[must_use]
    pub fn blogs(&self) -> &[Blog] {
        self.store.blogs()
    }

    /// All comments in insertion order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.store.comments()
    }

    /// Find a user by id.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.store.user(id)
    }

    /// Find a blog by id.
    #[must_use]
    pub fn blog(&self, id: &BlogId) -> Option<&Blog> {
        self.store.blog(id)
    }

    /// Find a comment by id.
    #[must_use]
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.store.comment(id)
    }

    /// Number of users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }

    /// Number of blogs.
    #[must_use]
    pub fn blog_count(&self) -> usize {
        self.store.blog_count()
    }

    /// Number of comments.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.store.comment_count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
