//! Domains module containing business logic organized by bounded contexts.
//!
//! - **media**: path confinement and metadata extraction for image and video files
//! - **tools**: the MCP tools built on top of it

pub mod media;
pub mod tools;
