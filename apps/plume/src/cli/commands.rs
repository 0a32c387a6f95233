//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::bus::BroadcastBus;
use crate::config::Config;
use crate::error::AppError;
use crate::ident::UuidIds;
use plume_core::{SeedData, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum seed file size (10 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_SEED_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AppError::Seed(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate file path for security.
///
/// Canonicalizes the path to resolve symlinks and "..", and ensures it
/// is an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| AppError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// SEED LOADING
// =============================================================================

/// Load and parse a JSON seed file.
pub fn load_seed(path: &Path) -> Result<SeedData, AppError> {
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, MAX_SEED_FILE_SIZE)?;

    let contents = std::fs::read_to_string(&canonical)
        .map_err(|e| AppError::Io(format!("Cannot read seed file: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| AppError::Seed(format!("Invalid seed JSON: {}", e)))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    seed: Option<&Path>,
) -> Result<(), AppError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let bus = BroadcastBus::default();
    let mut session = Session::with_parts(Box::new(UuidIds::new()), Arc::new(bus.clone()));

    if let Some(path) = seed {
        let data = load_seed(path)?;
        session.seed(data)?;
        tracing::info!(
            users = session.user_count(),
            blogs = session.blog_count(),
            comments = session.comment_count(),
            "seed data loaded"
        );
    }

    let rate_limit = api::rate_limit_from_env().unwrap_or(config.limits.rate_limit);
    let addr = config.bind_addr();

    println!("Plume Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:        {}", config.server.host);
    println!("  Port:        {}", config.server.port);
    println!("  Rate limit:  {} req/s", rate_limit);
    println!();

    let state = AppState::new(session, bus);
    api::run_server(&addr, state, rate_limit).await
}

// =============================================================================
// CHECK-SEED COMMAND
// =============================================================================

/// Validate a seed file against the store invariants and print counts.
pub fn cmd_check_seed(file: &Path) -> Result<(), AppError> {
    let data = load_seed(file)?;

    let mut session = Session::new();
    session.seed(data)?;

    println!("Seed file OK: {}", file.display());
    println!("  Users:    {}", session.user_count());
    println!("  Blogs:    {}", session.blog_count());
    println!("  Comments: {}", session.comment_count());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn load_seed_parses_valid_json() {
        let file = write_temp(
            r#"{
                "users": [{"id": "u-1", "name": "Alice", "email": "a@example.com", "age": 30}],
                "blogs": [{"id": "b-1", "title": "T", "body": "B", "published": true, "author": "u-1"}],
                "comments": []
            }"#,
        );

        let data = load_seed(file.path()).expect("seed");
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.blogs.len(), 1);
        assert!(data.comments.is_empty());
    }

    #[test]
    fn load_seed_defaults_missing_sections() {
        let file = write_temp(r#"{"users": []}"#);
        let data = load_seed(file.path()).expect("seed");
        assert!(data.blogs.is_empty());
        assert!(data.comments.is_empty());
    }

    #[test]
    fn load_seed_rejects_invalid_json() {
        let file = write_temp("not json");
        assert!(matches!(load_seed(file.path()), Err(AppError::Seed(_))));
    }

    #[test]
    fn load_seed_rejects_missing_file() {
        let result = load_seed(Path::new("/nonexistent/seed.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn validate_file_size_rejects_oversized() {
        let file = write_temp("0123456789");
        let result = validate_file_size(file.path(), 4);
        assert!(matches!(result, Err(AppError::Seed(_))));
    }

    #[test]
    fn check_seed_rejects_dangling_author() {
        let file = write_temp(
            r#"{
                "blogs": [{"id": "b-1", "title": "T", "body": "B", "published": true, "author": "ghost"}]
            }"#,
        );
        assert!(cmd_check_seed(file.path()).is_err());
    }
}
