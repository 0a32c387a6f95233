//! Integration tests for the Plume HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use plume::api::{
    AppState, BlogResponse, CommentResponse, HealthResponse, StatusResponse, UserResponse,
    create_router_with_limit,
};
use plume::bus::BroadcastBus;
use plume::ident::UuidIds;
use plume_core::{Blog, Comment, Session, User};
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server with a fresh in-memory session.
///
/// Rate limiting is disabled so request-heavy tests stay deterministic.
fn create_test_server() -> TestServer {
    let bus = BroadcastBus::default();
    let session = Session::with_parts(Box::new(UuidIds::new()), Arc::new(bus.clone()));
    let state = AppState::new(session, bus);
    let router = create_router_with_limit(state, 0);
    TestServer::new(router).unwrap()
}

/// Create a user and return its id.
async fn create_user(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/users")
        .json(&json!({"name": name, "email": email, "age": 30}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: UserResponse = response.json();
    body.user.unwrap().id.to_string()
}

/// Create a blog and return its id.
async fn create_blog(server: &TestServer, author: &str, title: &str, published: bool) -> String {
    let response = server
        .post("/blogs")
        .json(&json!({"title": title, "body": "Body", "published": published, "author": author}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: BlogResponse = response.json();
    body.blog.unwrap().id.to_string()
}

/// Create a comment and return its id.
async fn create_comment(server: &TestServer, author: &str, blog: &str, text: &str) -> String {
    let response = server
        .post("/comments")
        .json(&json!({"text": text, "author": author, "blog": blog}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: CommentResponse = response.json();
    body.comment.unwrap().id.to_string()
}

async fn fetch_status(server: &TestServer) -> StatusResponse {
    let response = server.get("/status").await;
    response.assert_status_ok();
    response.json()
}

// =============================================================================
// HEALTH / STATUS TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_status_starts_empty() {
    let server = create_test_server();

    let status = fetch_status(&server).await;
    assert_eq!(status.user_count, 0);
    assert_eq!(status.blog_count, 0);
    assert_eq!(status.comment_count, 0);
    assert_eq!(status.subscriber_count, 0);
}

// =============================================================================
// USER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_create_and_list_users() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let bob = create_user(&server, "Bob", "bob@example.com").await;
    assert_ne!(alice, bob);

    let response = server.get("/users").await;
    response.assert_status_ok();
    let users: Vec<User> = response.json();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Alice");
    assert_eq!(users[1].name, "Bob");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let server = create_test_server();

    create_user(&server, "Alice", "alice@example.com").await;

    let response = server
        .post("/users")
        .json(&json!({"name": "Imposter", "email": "alice@example.com", "age": 40}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: UserResponse = response.json();
    assert!(!body.success);
    assert!(body.error.is_some());

    let status = fetch_status(&server).await;
    assert_eq!(status.user_count, 1);
}

#[tokio::test]
async fn test_invalid_email_rejected_at_boundary() {
    let server = create_test_server();

    let response = server
        .post("/users")
        .json(&json!({"name": "Alice", "email": "not-an-email", "age": 30}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_partial_merge() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;

    let response = server
        .patch(&format!("/users/{}", alice))
        .json(&json!({"age": 31}))
        .await;

    response.assert_status_ok();
    let body: UserResponse = response.json();
    let user = body.user.unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.age, 31);
}

#[tokio::test]
async fn test_update_user_keeps_own_email() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;

    // Re-submitting the user's current email is not a duplicate.
    let response = server
        .patch(&format!("/users/{}", alice))
        .json(&json!({"email": "alice@example.com", "name": "Alicia"}))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_update_missing_user_not_found() {
    let server = create_test_server();

    let response = server
        .patch("/users/ghost")
        .json(&json!({"age": 99}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let bob = create_user(&server, "Bob", "bob@example.com").await;
    let blog = create_blog(&server, &alice, "Alice's blog", true).await;
    create_comment(&server, &bob, &blog, "nice post").await;

    let response = server.delete(&format!("/users/{}", alice)).await;
    response.assert_status_ok();

    // Alice's blog and Bob's comment on it are both gone; Bob survives.
    let status = fetch_status(&server).await;
    assert_eq!(status.user_count, 1);
    assert_eq!(status.blog_count, 0);
    assert_eq!(status.comment_count, 0);
}

// =============================================================================
// BLOG ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_create_blog_requires_live_author() {
    let server = create_test_server();

    let response = server
        .post("/blogs")
        .json(&json!({"title": "T", "body": "B", "published": true, "author": "ghost"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_blog_published_defaults_false() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let response = server
        .post("/blogs")
        .json(&json!({"title": "Draft", "body": "B", "author": alice}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: BlogResponse = response.json();
    assert!(!body.blog.unwrap().published);
}

#[tokio::test]
async fn test_update_blog_merges_fields() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let blog = create_blog(&server, &alice, "Old title", false).await;

    let response = server
        .patch(&format!("/blogs/{}", blog))
        .json(&json!({"title": "New title"}))
        .await;

    response.assert_status_ok();
    let body: BlogResponse = response.json();
    let updated = body.blog.unwrap();
    assert_eq!(updated.title, "New title");
    assert_eq!(updated.body, "Body");
    assert!(!updated.published);
}

#[tokio::test]
async fn test_delete_blog_cascades_comments() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let blog = create_blog(&server, &alice, "Post", true).await;
    create_comment(&server, &alice, &blog, "first").await;
    create_comment(&server, &alice, &blog, "second").await;

    let response = server.delete(&format!("/blogs/{}", blog)).await;
    response.assert_status_ok();

    let status = fetch_status(&server).await;
    assert_eq!(status.blog_count, 0);
    assert_eq!(status.comment_count, 0);
    assert_eq!(status.user_count, 1);
}

#[tokio::test]
async fn test_delete_missing_blog_not_found() {
    let server = create_test_server();

    let response = server.delete("/blogs/ghost").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// COMMENT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_comment_requires_published_blog() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let draft = create_blog(&server, &alice, "Draft", false).await;

    let response = server
        .post("/comments")
        .json(&json!({"text": "too early", "author": alice, "blog": draft}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_comment_full_round_trip() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let blog = create_blog(&server, &alice, "Post", true).await;
    let comment = create_comment(&server, &alice, &blog, "original").await;

    let response = server
        .patch(&format!("/comments/{}", comment))
        .json(&json!({"text": "edited"}))
        .await;
    response.assert_status_ok();

    let response = server.get("/comments").await;
    response.assert_status_ok();
    let comments: Vec<Comment> = response.json();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "edited");

    let response = server.delete(&format!("/comments/{}", comment)).await;
    response.assert_status_ok();

    let status = fetch_status(&server).await;
    assert_eq!(status.comment_count, 0);
}

#[tokio::test]
async fn test_empty_comment_text_rejected() {
    let server = create_test_server();

    let response = server
        .post("/comments")
        .json(&json!({"text": "", "author": "u", "blog": "b"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// SUBSCRIPTION TESTS
// =============================================================================

#[tokio::test]
async fn test_blog_subscription_streams_publish_events() {
    let bus = BroadcastBus::default();
    let session = Session::with_parts(Box::new(UuidIds::new()), Arc::new(bus.clone()));
    let state = AppState::new(session, bus);
    let router = create_router_with_limit(state, 0);

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .unwrap();

    let mut socket = server
        .get_websocket("/subscribe/blogs")
        .await
        .into_websocket()
        .await;

    let alice = create_user(&server, "Alice", "alice@example.com").await;

    // Creating an unpublished blog emits nothing; publishing it emits CREATED.
    let draft = create_blog(&server, &alice, "Post", false).await;
    let response = server
        .patch(&format!("/blogs/{}", draft))
        .json(&json!({"published": true}))
        .await;
    response.assert_status_ok();

    let message = socket.receive_text().await;
    let event: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(event["mutation"], "CREATED");
    assert_eq!(event["data"]["title"], "Post");
    assert_eq!(event["data"]["published"], true);

    // Unpublishing emits DELETED carrying the pre-update snapshot.
    let response = server
        .patch(&format!("/blogs/{}", draft))
        .json(&json!({"published": false}))
        .await;
    response.assert_status_ok();

    let message = socket.receive_text().await;
    let event: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(event["mutation"], "DELETED");
    assert_eq!(event["data"]["published"], true);
}

#[tokio::test]
async fn test_comment_subscription_scoped_to_blog() {
    let bus = BroadcastBus::default();
    let session = Session::with_parts(Box::new(UuidIds::new()), Arc::new(bus.clone()));
    let state = AppState::new(session, bus);
    let router = create_router_with_limit(state, 0);

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .unwrap();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let watched = create_blog(&server, &alice, "Watched", true).await;
    let other = create_blog(&server, &alice, "Other", true).await;

    let mut socket = server
        .get_websocket(&format!("/subscribe/comments/{}", watched))
        .await
        .into_websocket()
        .await;

    // A comment on the other blog must not reach this subscriber.
    create_comment(&server, &alice, &other, "elsewhere").await;
    create_comment(&server, &alice, &watched, "right here").await;

    let message = socket.receive_text().await;
    let event: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(event["mutation"], "CREATED");
    assert_eq!(event["data"]["text"], "right here");
    assert_eq!(event["data"]["blog"], watched);
}

// =============================================================================
// VISIBILITY SEQUENCE TEST
// =============================================================================

#[tokio::test]
async fn test_title_change_on_published_blog_emits_updated() {
    let bus = BroadcastBus::default();
    let session = Session::with_parts(Box::new(UuidIds::new()), Arc::new(bus.clone()));
    let state = AppState::new(session, bus);
    let router = create_router_with_limit(state, 0);

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .unwrap();

    let mut socket = server
        .get_websocket("/subscribe/blogs")
        .await
        .into_websocket()
        .await;

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let blog = create_blog(&server, &alice, "Post", true).await;

    let message = socket.receive_text().await;
    let event: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(event["mutation"], "CREATED");

    // A content-only edit of a live blog still notifies subscribers.
    let response = server
        .patch(&format!("/blogs/{}", blog))
        .json(&json!({"title": "Post, revised"}))
        .await;
    response.assert_status_ok();

    let message = socket.receive_text().await;
    let event: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(event["mutation"], "UPDATED");
    assert_eq!(event["data"]["title"], "Post, revised");
}

// =============================================================================
// LIST ORDER TEST
// =============================================================================

#[tokio::test]
async fn test_blogs_listed_in_insertion_order() {
    let server = create_test_server();

    let alice = create_user(&server, "Alice", "alice@example.com").await;
    let first = create_blog(&server, &alice, "First", false).await;
    let second = create_blog(&server, &alice, "Second", true).await;

    let response = server.get("/blogs").await;
    response.assert_status_ok();
    let blogs: Vec<Blog> = response.json();
    assert_eq!(blogs.len(), 2);
    assert_eq!(blogs[0].id.to_string(), first);
    assert_eq!(blogs[1].id.to_string(), second);
}
