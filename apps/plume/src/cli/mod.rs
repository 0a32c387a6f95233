//! # Plume CLI Module
//!
//! This module implements the CLI interface for Plume.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (the default command)
//! - `check-seed` - Validate a seed file without starting the server

mod commands;

use crate::config::Config;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Plume - social content server
///
/// An in-memory store of users, blogs, and comments with cascading
/// deletes and live publish/unpublish notifications.
#[derive(Parser, Debug)]
#[command(name = "plume")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON seed file to load at startup
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },

    /// Validate a seed file without starting the server
    CheckSeed {
        /// Path to the JSON seed file
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the parsed CLI command. No subcommand starts the server.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Server {
        host: None,
        port: None,
        seed: None,
    });

    match command {
        Commands::Server { host, port, seed } => {
            commands::cmd_server(config, host, port, seed.as_deref()).await
        }
        Commands::CheckSeed { file } => commands::cmd_check_seed(&file),
    }
}
