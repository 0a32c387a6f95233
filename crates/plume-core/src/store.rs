//! # Collection Store
//!
//! The in-memory store backing the mutation layer: three insertion-ordered
//! collections, one per entity kind, each keyed by a unique string id.
//!
//! The store is an explicitly owned value injected into every operation,
//! never ambient global state, so tests get a fresh instance each.
//! It exposes find-by-predicate, remove-by-predicate, and append; cascade
//! composition lives in [`IntegrityEngine`](crate::integrity::IntegrityEngine).
//!
//! ## Concurrency
//!
//! Single logical owner: one mutation is fully applied before the next
//! begins. The caller serializes mutation invocations (the server wraps
//! the session in a lock); the store itself carries no synchronization.

use crate::{Blog, BlogId, Comment, CommentId, User, UserId};

// =============================================================================
// STORE
// =============================================================================

/// The three ordered collections of the content store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    users: Vec<User>,
    blogs: Vec<Blog>,
    comments: Vec<Comment>,
}

impl Store {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// All users in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Find a user by id.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Find a user by id, mutably.
    pub fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| &u.id == id)
    }

    /// Whether any user holds this email.
    ///
    /// Full linear scan: O(n) per write, acceptable at this scale.
    #[must_use]
    pub fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }

    /// Whether a user other than `id` holds this email.
    ///
    /// Used on update so a user may keep their own email unchanged.
    #[must_use]
    pub fn email_taken_by_other(&self, email: &str, id: &UserId) -> bool {
        self.users.iter().any(|u| u.email == email && &u.id != id)
    }

    /// Append a user.
    pub fn push_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Remove a user by id, returning the removed record.
    pub fn remove_user(&mut self, id: &UserId) -> Option<User> {
        let index = self.users.iter().position(|u| &u.id == id)?;
        Some(self.users.remove(index))
    }

    // =========================================================================
    // BLOGS
    // =========================================================================

    /// All blogs in insertion order.
    #[must_use]
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    /// Find a blog by id.
    #[must_use]
    pub fn blog(&self, id: &BlogId) -> Option<&Blog> {
        self.blogs.iter().find(|b| &b.id == id)
    }

    /// Find a blog by id, mutably.
    pub fn blog_mut(&mut self, id: &BlogId) -> Option<&mut Blog> {
        self.blogs.iter_mut().find(|b| &b.id == id)
    }

    /// Append a blog.
    pub fn push_blog(&mut self, blog: Blog) {
        self.blogs.push(blog);
    }

    /// Remove a blog by id, returning the removed record.
    pub fn remove_blog(&mut self, id: &BlogId) -> Option<Blog> {
        let index = self.blogs.iter().position(|b| &b.id == id)?;
        Some(self.blogs.remove(index))
    }

    /// Remove every blog authored by `author`, returning the removed
    /// records in their original order.
    pub fn remove_blogs_by_author(&mut self, author: &UserId) -> Vec<Blog> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.blogs)
            .into_iter()
            .partition(|b| &b.author == author);
        self.blogs = kept;
        removed
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// All comments in insertion order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Find a comment by id.
    #[must_use]
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    /// Find a comment by id, mutably.
    pub fn comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| &c.id == id)
    }

    /// Append a comment.
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Remove a comment by id, returning the removed record.
    pub fn remove_comment(&mut self, id: &CommentId) -> Option<Comment> {
        let index = self.comments.iter().position(|c| &c.id == id)?;
        Some(self.comments.remove(index))
    }

    /// Remove every comment attached to `blog`.
    pub fn remove_comments_on_blog(&mut self, blog: &BlogId) {
        self.comments.retain(|c| &c.blog != blog);
    }

    /// Remove every comment authored by `author`.
    pub fn remove_comments_by_author(&mut self, author: &UserId) {
        self.comments.retain(|c| &c.author != author);
    }

    // =========================================================================
    // COUNTS
    // =========================================================================

    /// Number of users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of blogs.
    #[must_use]
    pub fn blog_count(&self) -> usize {
        self.blogs.len()
    }

    /// Number of comments.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
