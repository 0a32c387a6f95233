//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Request types validate at the boundary (non-empty fields, length
//! caps) before anything reaches the core engine; core-level rules
//! (email uniqueness, referential checks) stay in plume-core.

use plume_core::{
    Blog, BlogDraft, BlogId, BlogPatch, Comment, CommentDraft, CommentPatch, User, UserDraft,
    UserId, UserPatch,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// BOUNDARY LIMITS
// =============================================================================

/// Maximum user name length (bytes).
pub const MAX_NAME_LENGTH: usize = 256;
/// Maximum email length (bytes); RFC 3696 erratum ceiling.
pub const MAX_EMAIL_LENGTH: usize = 320;
/// Maximum blog title length (bytes).
pub const MAX_TITLE_LENGTH: usize = 512;
/// Maximum blog body length (bytes).
pub const MAX_BODY_LENGTH: usize = 64 * 1024;
/// Maximum comment text length (bytes).
pub const MAX_TEXT_LENGTH: usize = 8 * 1024;

fn require(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    bound(field, value, max)
}

fn bound(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.len() > max {
        return Err(format!(
            "{field} length {} exceeds maximum {} bytes",
            value.len(),
            max
        ));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), String> {
    require("email", email, MAX_EMAIL_LENGTH)?;
    if !email.contains('@') {
        return Err("email must contain '@'".to_string());
    }
    Ok(())
}

// =============================================================================
// HEALTH / STATUS RESPONSES
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Store status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub user_count: usize,
    pub blog_count: usize,
    pub comment_count: usize,
    pub subscriber_count: usize,
}

// =============================================================================
// USER REQUESTS/RESPONSES
// =============================================================================

/// User creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl CreateUserRequest {
    /// Convert to a core draft, validating fields at the boundary.
    pub fn to_draft(&self) -> Result<UserDraft, String> {
        require("name", &self.name, MAX_NAME_LENGTH)?;
        require_email(&self.email)?;
        Ok(UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
        })
    }
}

/// User partial-update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

impl UpdateUserRequest {
    /// Convert to a core patch, validating every present field.
    pub fn to_patch(&self) -> Result<UserPatch, String> {
        if let Some(name) = &self.name {
            require("name", name, MAX_NAME_LENGTH)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(UserPatch {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
        })
    }
}

/// User mutation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl UserResponse {
    pub fn success(user: User) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// BLOG REQUESTS/RESPONSES
// =============================================================================

/// Blog creation request. `published` defaults to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub published: bool,
    pub author: String,
}

impl CreateBlogRequest {
    /// Convert to a core draft, validating fields at the boundary.
    pub fn to_draft(&self) -> Result<BlogDraft, String> {
        require("title", &self.title, MAX_TITLE_LENGTH)?;
        bound("body", &self.body, MAX_BODY_LENGTH)?;
        require("author", &self.author, MAX_NAME_LENGTH)?;
        Ok(BlogDraft {
            title: self.title.clone(),
            body: self.body.clone(),
            published: self.published,
            author: UserId::new(&self.author),
        })
    }
}

/// Blog partial-update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

impl UpdateBlogRequest {
    /// Convert to a core patch, validating every present field.
    pub fn to_patch(&self) -> Result<BlogPatch, String> {
        if let Some(title) = &self.title {
            require("title", title, MAX_TITLE_LENGTH)?;
        }
        if let Some(body) = &self.body {
            bound("body", body, MAX_BODY_LENGTH)?;
        }
        Ok(BlogPatch {
            title: self.title.clone(),
            body: self.body.clone(),
            published: self.published,
        })
    }
}

/// Blog mutation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub success: bool,
    pub blog: Option<Blog>,
    pub error: Option<String>,
}

impl BlogResponse {
    pub fn success(blog: Blog) -> Self {
        Self {
            success: true,
            blog: Some(blog),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            blog: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// COMMENT REQUESTS/RESPONSES
// =============================================================================

/// Comment creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub author: String,
    pub blog: String,
}

impl CreateCommentRequest {
    /// Convert to a core draft, validating fields at the boundary.
    pub fn to_draft(&self) -> Result<CommentDraft, String> {
        require("text", &self.text, MAX_TEXT_LENGTH)?;
        require("author", &self.author, MAX_NAME_LENGTH)?;
        require("blog", &self.blog, MAX_NAME_LENGTH)?;
        Ok(CommentDraft {
            text: self.text.clone(),
            author: UserId::new(&self.author),
            blog: BlogId::new(&self.blog),
        })
    }
}

/// Comment partial-update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

impl UpdateCommentRequest {
    /// Convert to a core patch, validating every present field.
    pub fn to_patch(&self) -> Result<CommentPatch, String> {
        if let Some(text) = &self.text {
            require("text", text, MAX_TEXT_LENGTH)?;
        }
        Ok(CommentPatch {
            text: self.text.clone(),
        })
    }
}

/// Comment mutation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub success: bool,
    pub comment: Option<Comment>,
    pub error: Option<String>,
}

impl CommentResponse {
    pub fn success(comment: Comment) -> Self {
        Self {
            success: true,
            comment: Some(comment),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            comment: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_request_rejects_bad_email() {
        let request = CreateUserRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            age: 30,
        };
        assert!(request.to_draft().is_err());
    }

    #[test]
    fn create_user_request_rejects_empty_name() {
        let request = CreateUserRequest {
            name: String::new(),
            email: "a@example.com".to_string(),
            age: 30,
        };
        assert!(request.to_draft().is_err());
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let request = UpdateUserRequest {
            age: Some(31),
            ..UpdateUserRequest::default()
        };
        let patch = request.to_patch().expect("patch");
        assert_eq!(patch.age, Some(31));
        assert_eq!(patch.name, None);

        let bad = UpdateUserRequest {
            email: Some("nope".to_string()),
            ..UpdateUserRequest::default()
        };
        assert!(bad.to_patch().is_err());
    }

    #[test]
    fn blog_request_caps_title_length() {
        let request = CreateBlogRequest {
            title: "t".repeat(MAX_TITLE_LENGTH + 1),
            body: String::new(),
            published: true,
            author: "u-1".to_string(),
        };
        assert!(request.to_draft().is_err());
    }

    #[test]
    fn blog_request_allows_empty_body() {
        let request = CreateBlogRequest {
            title: "Title".to_string(),
            body: String::new(),
            published: false,
            author: "u-1".to_string(),
        };
        assert!(request.to_draft().is_ok());
    }

    #[test]
    fn published_defaults_to_false_on_the_wire() {
        let request: CreateBlogRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","author":"u-1"}"#).expect("parse");
        assert!(!request.published);
    }
}
