//! # Mutation Engine
//!
//! Consolidates the nine mutation operations of the content store.
//!
//! Every operation is a single atomic critical section: validation, then
//! cascade computation, then collection update, then zero or more bus
//! publishes. Errors are raised before any store mutation occurs, so a
//! failed mutation leaves the store unchanged and publishes nothing.
//!
//! User mutations never publish. Blog mutations publish according to the
//! [`VisibilityEngine`] transition table. Comment mutations publish
//! unconditionally to the owning blog's comment topic — a comment's blog
//! is already known to be published at creation time, so there is no
//! visibility gating for comments.

use crate::bus::{Event, NotificationBus};
use crate::ident::IdSource;
use crate::integrity::IntegrityEngine;
use crate::store::Store;
use crate::visibility::VisibilityEngine;
use crate::{
    Blog, BlogDraft, BlogId, BlogPatch, Comment, CommentDraft, CommentId, CommentPatch,
    MutationKind, PlumeError, User, UserDraft, UserId, UserPatch,
};

/// The MutationEngine applies validated mutations to the store.
pub struct MutationEngine;

impl MutationEngine {
    // =========================================================================
    // USERS
    // =========================================================================

    /// Create a user. Fails with `DuplicateEmail` if any user holds the
    /// draft's email.
    pub fn create_user(
        store: &mut Store,
        ids: &mut dyn IdSource,
        draft: UserDraft,
    ) -> Result<User, PlumeError> {
        if store.email_taken(&draft.email) {
            return Err(PlumeError::DuplicateEmail);
        }

        let user = User {
            id: UserId::new(ids.next_id()),
            name: draft.name,
            email: draft.email,
            age: draft.age,
        };
        store.push_user(user.clone());

        Ok(user)
    }

    /// Update a user field-by-field.
    ///
    /// An email change is rejected if another user already holds the new
    /// email; a user may always keep their own email.
    pub fn update_user(
        store: &mut Store,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<User, PlumeError> {
        if store.user(id).is_none() {
            return Err(PlumeError::UserNotFound(id.clone()));
        }
        if let Some(email) = &patch.email {
            if store.email_taken_by_other(email, id) {
                return Err(PlumeError::DuplicateEmail);
            }
        }

        let user = store
            .user_mut(id)
            .ok_or_else(|| PlumeError::UserNotFound(id.clone()))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }

        Ok(user.clone())
    }

    /// Delete a user, cascading to their blogs and comments.
    ///
    /// Cascaded removals publish nothing: only the directly requested
    /// mutation notifies subscribers.
    pub fn delete_user(store: &mut Store, id: &UserId) -> Result<User, PlumeError> {
        IntegrityEngine::delete_user(store, id)
    }

    // =========================================================================
    // BLOGS
    // =========================================================================

    /// Create a blog. Fails with `InvalidUserRef` if the author does not
    /// exist. Publishes a blog `Created` event iff the blog is published.
    pub fn create_blog(
        store: &mut Store,
        ids: &mut dyn IdSource,
        bus: &dyn NotificationBus,
        draft: BlogDraft,
    ) -> Result<Blog, PlumeError> {
        if store.user(&draft.author).is_none() {
            return Err(PlumeError::InvalidUserRef(draft.author));
        }

        let blog = Blog {
            id: BlogId::new(ids.next_id()),
            title: draft.title,
            body: draft.body,
            published: draft.published,
            author: draft.author,
        };
        store.push_blog(blog.clone());

        if let Some(kind) = VisibilityEngine::transition(None, Some(blog.published)) {
            bus.publish(Event::blog(kind, blog.clone()));
        }

        Ok(blog)
    }

    /// Update a blog field-by-field, emitting the visibility event.
    ///
    /// The transition is computed from the effective `published` value
    /// before and after the merge. A logical delete (publish → unpublish)
    /// carries the pre-update snapshot; `Created` and `Updated` carry the
    /// merged record.
    pub fn update_blog(
        store: &mut Store,
        bus: &dyn NotificationBus,
        id: &BlogId,
        patch: BlogPatch,
    ) -> Result<Blog, PlumeError> {
        let blog = store
            .blog_mut(id)
            .ok_or_else(|| PlumeError::BlogNotFound(id.clone()))?;
        let before = blog.clone();

        if let Some(title) = patch.title {
            blog.title = title;
        }
        if let Some(body) = patch.body {
            blog.body = body;
        }
        if let Some(published) = patch.published {
            blog.published = published;
        }
        let after = blog.clone();

        match VisibilityEngine::transition(Some(before.published), Some(after.published)) {
            Some(MutationKind::Deleted) => bus.publish(Event::blog(MutationKind::Deleted, before)),
            Some(kind) => bus.publish(Event::blog(kind, after.clone())),
            None => {}
        }

        Ok(after)
    }

    /// Delete a blog, cascading to its comments.
    ///
    /// Publishes a blog `Deleted` event iff the blog was published at the
    /// time of deletion.
    pub fn delete_blog(
        store: &mut Store,
        bus: &dyn NotificationBus,
        id: &BlogId,
    ) -> Result<Blog, PlumeError> {
        let blog = IntegrityEngine::delete_blog(store, id)?;

        if let Some(kind) = VisibilityEngine::transition(Some(blog.published), None) {
            bus.publish(Event::blog(kind, blog.clone()));
        }

        Ok(blog)
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// Create a comment.
    ///
    /// The author must exist (`InvalidUserRef`) and the blog must exist
    /// and be published (`InvalidBlogRef`). Publishes `Created` to the
    /// blog's comment topic.
    pub fn create_comment(
        store: &mut Store,
        ids: &mut dyn IdSource,
        bus: &dyn NotificationBus,
        draft: CommentDraft,
    ) -> Result<Comment, PlumeError> {
        if store.user(&draft.author).is_none() {
            return Err(PlumeError::InvalidUserRef(draft.author));
        }
        if !store.blog(&draft.blog).is_some_and(|b| b.published) {
            return Err(PlumeError::InvalidBlogRef(draft.blog));
        }

        let comment = Comment {
            id: CommentId::new(ids.next_id()),
            text: draft.text,
            author: draft.author,
            blog: draft.blog,
        };
        store.push_comment(comment.clone());

        bus.publish(Event::comment(MutationKind::Created, comment.clone()));

        Ok(comment)
    }

    /// Update a comment. Publishes `Updated` unconditionally, even for an
    /// empty patch.
    pub fn update_comment(
        store: &mut Store,
        bus: &dyn NotificationBus,
        id: &CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, PlumeError> {
        let comment = store
            .comment_mut(id)
            .ok_or_else(|| PlumeError::CommentNotFound(id.clone()))?;

        if let Some(text) = patch.text {
            comment.text = text;
        }
        let comment = comment.clone();

        bus.publish(Event::comment(MutationKind::Updated, comment.clone()));

        Ok(comment)
    }

    /// Delete a comment. Publishes `Deleted` to the owning blog's topic.
    pub fn delete_comment(
        store: &mut Store,
        bus: &dyn NotificationBus,
        id: &CommentId,
    ) -> Result<Comment, PlumeError> {
        let comment = store
            .remove_comment(id)
            .ok_or_else(|| PlumeError::CommentNotFound(id.clone()))?;

        bus.publish(Event::comment(MutationKind::Deleted, comment.clone()));

        Ok(comment)
    }
}

// =============================================================================
// TESTS
// =============================================================================
