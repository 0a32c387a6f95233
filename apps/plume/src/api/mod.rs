//! # Plume HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Store counts and subscriber count
//! - `GET /users` / `POST /users` - List and create users
//! - `PATCH /users/{id}` / `DELETE /users/{id}` - Update and delete users
//! - `GET /blogs` / `POST /blogs` - List and create blogs
//! - `PATCH /blogs/{id}` / `DELETE /blogs/{id}` - Update and delete blogs
//! - `GET /comments` / `POST /comments` - List and create comments
//! - `PATCH /comments/{id}` / `DELETE /comments/{id}` - Update and delete comments
//! - `GET /subscribe/blogs` - WebSocket stream of blog visibility events
//! - `GET /subscribe/comments/{blog_id}` - WebSocket stream of one blog's comment events
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `PLUME_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `PLUME_RATE_LIMIT`: Requests per second override (0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{create_rate_limiter, rate_limit_from_env};
// Re-export handlers and types for integration tests (via `plume::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    create_blog_handler, create_comment_handler, create_user_handler, delete_blog_handler,
    delete_comment_handler, delete_user_handler, health_handler, list_blogs_handler,
    list_comments_handler, list_users_handler, status_handler, subscribe_blogs_handler,
    subscribe_comments_handler, update_blog_handler, update_comment_handler, update_user_handler,
};
#[allow(unused_imports)]
pub use types::{
    BlogResponse, CommentResponse, CreateBlogRequest, CreateCommentRequest, CreateUserRequest,
    HealthResponse, StatusResponse, UpdateBlogRequest, UpdateCommentRequest, UpdateUserRequest,
    UserResponse,
};

use crate::bus::BroadcastBus;
use crate::error::AppError;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use plume_core::Session;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the session plus the broadcast bus.
///
/// The bus handle here must be the same one the session publishes to;
/// subscription sockets attach to it via [`BroadcastBus::subscribe`].
#[derive(Clone)]
pub struct AppState {
    /// The session containing the store.
    pub session: Arc<RwLock<Session>>,
    /// The broadcast bus the session publishes events to.
    pub bus: BroadcastBus,
}

impl AppState {
    /// Create new app state from a session and the bus it publishes to.
    #[must_use]
    pub fn new(session: Session, bus: BroadcastBus) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            bus,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `PLUME_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("PLUME_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (PLUME_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in PLUME_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No PLUME_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with the default rate limit.
///
/// `PLUME_RATE_LIMIT` overrides the limit; absent, 100 requests per
/// second applies. The CLI path goes through
/// [`create_router_with_limit`] so config-file values take effect.
pub fn create_router(state: AppState) -> Router {
    create_router_with_limit(state, rate_limit_from_env().unwrap_or(100))
}

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting - protects against DoS (if enabled)
pub fn create_router_with_limit(state: AppState, rate_limit: u32) -> Router {
    let cors = build_cors_layer();

    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/users", get(handlers::list_users_handler))
        .route("/users", post(handlers::create_user_handler))
        .route("/users/{id}", patch(handlers::update_user_handler))
        .route("/users/{id}", delete(handlers::delete_user_handler))
        .route("/blogs", get(handlers::list_blogs_handler))
        .route("/blogs", post(handlers::create_blog_handler))
        .route("/blogs/{id}", patch(handlers::update_blog_handler))
        .route("/blogs/{id}", delete(handlers::delete_blog_handler))
        .route("/comments", get(handlers::list_comments_handler))
        .route("/comments", post(handlers::create_comment_handler))
        .route("/comments/{id}", patch(handlers::update_comment_handler))
        .route("/comments/{id}", delete(handlers::delete_comment_handler))
        .route("/subscribe/blogs", get(handlers::subscribe_blogs_handler))
        .route(
            "/subscribe/comments/{blog_id}",
            get(handlers::subscribe_comments_handler),
        );

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState, rate_limit: u32) -> Result<(), AppError> {
    let router = create_router_with_limit(state, rate_limit);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Plume HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}
