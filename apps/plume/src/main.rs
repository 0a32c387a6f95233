//! # Plume - Social Content Server
//!
//! The main binary for the Plume in-memory social content store.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - WebSocket subscriptions for publish/unpublish and comment events
//! - CLI interface for startup and seed validation
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 apps/plume (THE BINARY)                │
//! │                                                        │
//! │  ┌──────────┐   ┌─────────────┐   ┌────────────────┐  │
//! │  │   CLI    │   │  HTTP API   │   │  Subscriptions │  │
//! │  │  (clap)  │   │   (axum)    │   │  (WebSocket)   │  │
//! │  └────┬─────┘   └──────┬──────┘   └───────┬────────┘  │
//! │       │                │                  │           │
//! │       └────────────────┼──────────────────┘           │
//! │                        ▼                              │
//! │                ┌──────────────┐                       │
//! │                │  plume-core  │                       │
//! │                │ (THE LOGIC)  │                       │
//! │                └──────────────┘                       │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! plume server --host 0.0.0.0 --port 8080
//!
//! # Start with seed data
//! plume server --seed seed.json
//!
//! # Validate a seed file
//! plume check-seed --file seed.json
//! ```

use clap::Parser;
use plume::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — PLUME_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PLUME_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plume=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Plume startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ██╗     ██╗   ██╗███╗   ███╗███████╗
  ██╔══██╗██║     ██║   ██║████╗ ████║██╔════╝
  ██████╔╝██║     ██║   ██║██╔████╔██║█████╗
  ██╔═══╝ ██║     ██║   ██║██║╚██╔╝██║██╔══╝
  ██║     ███████╗╚██████╔╝██║ ╚═╝ ██║███████╗
  ╚═╝     ╚══════╝ ╚═════╝ ╚═╝     ╚═╝╚══════╝

  Social Content Server v{}

  Users • Blogs • Comments • Live updates
"#,
        env!("CARGO_PKG_VERSION")
    );
}
