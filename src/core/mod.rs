//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, path confinement, server
//! lifecycle management, and transport layer abstractions.

pub mod cli;
pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use cli::Cli;
pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};
pub use security::{PathSecurityError, PermittedRoots, validate_path};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
