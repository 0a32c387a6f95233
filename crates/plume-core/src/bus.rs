//! # Notification Bus
//!
//! Topic-addressed publish mechanism for subscription events.
//!
//! The mutation engine only decides *what* is published and *when*; the
//! delivery mechanism behind [`NotificationBus`] is an external
//! collaborator. Publishing is fire-and-forget relative to the mutation's
//! result: the mutation succeeds whether or not anyone is listening, and
//! there is no acknowledgment, retry, or backpressure.
//!
//! Topics are either the single shared blog topic or one topic per blog
//! id for that blog's comment events.

use crate::{Blog, BlogId, Comment, MutationKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

// =============================================================================
// TOPICS
// =============================================================================

/// A named channel that subscribers attach to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// The single shared topic for all blog events.
    Blogs,
    /// The per-blog topic for that blog's comment events.
    Comments(BlogId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blogs => f.write_str("blog"),
            Self::Comments(blog) => write!(f, "comment {}", blog),
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// A subscription event: the mutation kind plus the affected record.
///
/// The wire shape is `{"mutation": "...", "data": {...}}` for both
/// variants; the record fields disambiguate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Blog { mutation: MutationKind, data: Blog },
    Comment { mutation: MutationKind, data: Comment },
}

impl Event {
    /// Build a blog event.
    #[must_use]
    pub fn blog(mutation: MutationKind, data: Blog) -> Self {
        Self::Blog { mutation, data }
    }

    /// Build a comment event.
    #[must_use]
    pub fn comment(mutation: MutationKind, data: Comment) -> Self {
        Self::Comment { mutation, data }
    }

    /// The topic this event is addressed to.
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Self::Blog { .. } => Topic::Blogs,
            Self::Comment { data, .. } => Topic::Comments(data.blog.clone()),
        }
    }

    /// The event kind.
    #[must_use]
    pub fn mutation(&self) -> MutationKind {
        match self {
            Self::Blog { mutation, .. } | Self::Comment { mutation, .. } => *mutation,
        }
    }
}

// =============================================================================
// BUS TRAIT
// =============================================================================

/// Topic-addressed publish mechanism.
///
/// # Extension Point
///
/// The core publishes through this trait and never observes delivery:
/// implementations must not block the mutation path and must not fail it.
/// The app layer provides a broadcast-channel implementation; tests use
/// [`MemoryBus`].
pub trait NotificationBus: Send + Sync {
    /// Publish an event to its topic.
    fn publish(&self, event: Event);
}

// =============================================================================
// MEMORY BUS
// =============================================================================

/// Recording bus that stores every published event in memory.
///
/// The default bus for [`Session::new`](crate::session::Session::new);
/// tests inspect what a mutation published via [`MemoryBus::events`].
#[derive(Debug, Default)]
pub struct MemoryBus {
    events: Mutex<Vec<Event>>,
}

impl MemoryBus {
    /// Create a new empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events published so far, in publish order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Take all recorded events, leaving the bus empty.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationBus for MemoryBus {
    fn publish(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommentId, UserId};

    fn sample_comment() -> Comment {
        Comment {
            id: CommentId::new("c-1"),
            text: "hi".to_string(),
            author: UserId::new("u-1"),
            blog: BlogId::new("b-1"),
        }
    }

    #[test]
    fn topic_string_forms() {
        assert_eq!(Topic::Blogs.to_string(), "blog");
        assert_eq!(
            Topic::Comments(BlogId::new("b-1")).to_string(),
            "comment b-1"
        );
    }

    #[test]
    fn comment_event_addresses_its_blog_topic() {
        let event = Event::comment(MutationKind::Created, sample_comment());
        assert_eq!(event.topic(), Topic::Comments(BlogId::new("b-1")));
        assert_eq!(event.mutation(), MutationKind::Created);
    }

    #[test]
    fn memory_bus_records_in_order() {
        let bus = MemoryBus::new();
        assert!(bus.is_empty());

        bus.publish(Event::comment(MutationKind::Created, sample_comment()));
        bus.publish(Event::comment(MutationKind::Deleted, sample_comment()));

        let events = bus.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].mutation(), MutationKind::Created);
        assert_eq!(events[1].mutation(), MutationKind::Deleted);

        assert_eq!(bus.drain().len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn event_wire_shape_is_mutation_plus_data() {
        let event = Event::comment(MutationKind::Updated, sample_comment());
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["mutation"], "UPDATED");
        assert_eq!(json["data"]["id"], "c-1");

        let back: Event = serde_json::from_value(json).expect("parse");
        assert_eq!(back, event);
    }
}
