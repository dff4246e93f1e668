//! Media Info MCP Server
//!
//! A Model Context Protocol server that reports read-only metadata for image
//! and video files. Every requested path is confined to a configured set of
//! permitted directories before any file is opened.
//!
//! # Architecture
//!
//! - **core**: configuration, CLI, error handling, path confinement, the
//!   server handler and the transports
//! - **domains**: business logic
//!   - **media**: image and video inspection behind the path guard
//!   - **tools**: the `get_images_info` and `get_videos_info` MCP tools
//!
//! # Example
//!
//! ```rust,no_run
//! use media_info_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env().with_permitted_roots(["/srv/media"]);
//!     config.validate()?;
//!     let server = McpServer::new(config);
//!     // Start the transport...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
