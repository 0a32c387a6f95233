//! # plume (library)
//!
//! Library surface of the Plume binary: the HTTP API, the broadcast bus,
//! the uuid id source, config loading, and the CLI. Exposed as a lib so
//! integration tests can drive the router without spawning a process.

pub mod api;
pub mod bus;
pub mod cli;
pub mod config;
pub mod error;
pub mod ident;
