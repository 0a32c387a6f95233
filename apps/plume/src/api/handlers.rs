//! # API Handlers
//!
//! HTTP and WebSocket handlers for the Plume API.
//!
//! Mutation handlers take the session write lock for the duration of
//! one mutation, so each mutation applies as a single atomic step.
//! Subscription handlers upgrade to a WebSocket and forward bus events
//! whose topic matches the subscribed channel.

use super::AppState;
use super::types::{
    BlogResponse, CommentResponse, CreateBlogRequest, CreateCommentRequest, CreateUserRequest,
    HealthResponse, StatusResponse, UpdateBlogRequest, UpdateCommentRequest, UpdateUserRequest,
    UserResponse,
};
use axum::{
    Json,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::IntoResponse,
};
use plume_core::{BlogId, CommentId, Event, PlumeError, Topic, UserId};
use tokio::sync::broadcast;

/// Map a core error to its HTTP status.
fn error_status(error: &PlumeError) -> StatusCode {
    match error {
        PlumeError::DuplicateEmail => StatusCode::CONFLICT,
        PlumeError::UserNotFound(_)
        | PlumeError::BlogNotFound(_)
        | PlumeError::CommentNotFound(_) => StatusCode::NOT_FOUND,
        PlumeError::InvalidUserRef(_) | PlumeError::InvalidBlogRef(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Store status endpoint.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(StatusResponse {
        user_count: session.user_count(),
        blog_count: session.blog_count(),
        comment_count: session.comment_count(),
        subscriber_count: state.bus.subscriber_count(),
    })
}

// =============================================================================
// USER HANDLERS
// =============================================================================

/// List all users in insertion order.
pub async fn list_users_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.users().to_vec())
}

/// Create a user.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    let draft = match request.to_draft() {
        Ok(draft) => draft,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(UserResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.create_user(draft) {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "user created");
            (StatusCode::CREATED, Json(UserResponse::success(user)))
        }
        Err(e) => (error_status(&e), Json(UserResponse::error(e.to_string()))),
    }
}

/// Update a user (partial merge).
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let patch = match request.to_patch() {
        Ok(patch) => patch,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(UserResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.update_user(&UserId::new(&id), patch) {
        Ok(user) => (StatusCode::OK, Json(UserResponse::success(user))),
        Err(e) => (error_status(&e), Json(UserResponse::error(e.to_string()))),
    }
}

/// Delete a user, cascading to their blogs and comments.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.delete_user(&UserId::new(&id)) {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "user deleted");
            (StatusCode::OK, Json(UserResponse::success(user)))
        }
        Err(e) => (error_status(&e), Json(UserResponse::error(e.to_string()))),
    }
}

// =============================================================================
// BLOG HANDLERS
// =============================================================================

/// List all blogs in insertion order.
pub async fn list_blogs_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.blogs().to_vec())
}

/// Create a blog, publishing a CREATED event when it starts published.
pub async fn create_blog_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateBlogRequest>,
) -> impl IntoResponse {
    let draft = match request.to_draft() {
        Ok(draft) => draft,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(BlogResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.create_blog(draft) {
        Ok(blog) => {
            tracing::debug!(blog_id = %blog.id, published = blog.published, "blog created");
            (StatusCode::CREATED, Json(BlogResponse::success(blog)))
        }
        Err(e) => (error_status(&e), Json(BlogResponse::error(e.to_string()))),
    }
}

/// Update a blog, emitting the visibility-transition event.
pub async fn update_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBlogRequest>,
) -> impl IntoResponse {
    let patch = match request.to_patch() {
        Ok(patch) => patch,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(BlogResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.update_blog(&BlogId::new(&id), patch) {
        Ok(blog) => (StatusCode::OK, Json(BlogResponse::success(blog))),
        Err(e) => (error_status(&e), Json(BlogResponse::error(e.to_string()))),
    }
}

/// Delete a blog, cascading to its comments.
pub async fn delete_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.delete_blog(&BlogId::new(&id)) {
        Ok(blog) => {
            tracing::debug!(blog_id = %blog.id, "blog deleted");
            (StatusCode::OK, Json(BlogResponse::success(blog)))
        }
        Err(e) => (error_status(&e), Json(BlogResponse::error(e.to_string()))),
    }
}

// =============================================================================
// COMMENT HANDLERS
// =============================================================================

/// List all comments in insertion order.
pub async fn list_comments_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.comments().to_vec())
}

/// Create a comment on a published blog.
pub async fn create_comment_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> impl IntoResponse {
    let draft = match request.to_draft() {
        Ok(draft) => draft,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(CommentResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.create_comment(draft) {
        Ok(comment) => {
            tracing::debug!(comment_id = %comment.id, blog_id = %comment.blog, "comment created");
            (StatusCode::CREATED, Json(CommentResponse::success(comment)))
        }
        Err(e) => (error_status(&e), Json(CommentResponse::error(e.to_string()))),
    }
}

/// Update a comment's text.
pub async fn update_comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> impl IntoResponse {
    let patch = match request.to_patch() {
        Ok(patch) => patch,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(CommentResponse::error(msg))),
    };

    let mut session = state.session.write().await;
    match session.update_comment(&CommentId::new(&id), patch) {
        Ok(comment) => (StatusCode::OK, Json(CommentResponse::success(comment))),
        Err(e) => (error_status(&e), Json(CommentResponse::error(e.to_string()))),
    }
}

/// Delete a comment.
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.delete_comment(&CommentId::new(&id)) {
        Ok(comment) => (StatusCode::OK, Json(CommentResponse::success(comment))),
        Err(e) => (error_status(&e), Json(CommentResponse::error(e.to_string()))),
    }
}

// =============================================================================
// SUBSCRIPTION HANDLERS
// =============================================================================

/// Subscribe to blog visibility events over a WebSocket.
pub async fn subscribe_blogs_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let receiver = state.bus.subscribe();
    ws.on_upgrade(move |socket| stream_topic(socket, receiver, Topic::Blogs))
}

/// Subscribe to comment events for one blog over a WebSocket.
pub async fn subscribe_comments_handler(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let receiver = state.bus.subscribe();
    let topic = Topic::Comments(BlogId::new(&blog_id));
    ws.on_upgrade(move |socket| stream_topic(socket, receiver, topic))
}

/// Forward matching events to the socket until either side closes.
///
/// A lagged receiver skips the dropped events and keeps streaming;
/// subscribers observe a gap rather than the connection dying.
async fn stream_topic(mut socket: WebSocket, mut receiver: broadcast::Receiver<Event>, topic: Topic) {
    tracing::debug!(%topic, "subscriber connected");
    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Ok(event) if event.topic() == topic => {
                    let Ok(payload) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(%topic, skipped, "subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = socket.recv() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    tracing::debug!(%topic, "subscriber disconnected");
}
