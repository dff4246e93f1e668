//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables and command-line arguments.
//! The configuration is built once at startup and shared read-only
//! (`Arc<Config>`) with every tool.

use super::error::{Error, Result};
use super::security::PermittedRoots;
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Path confinement configuration.
    pub security: SecurityConfig,

    /// Media decoding configuration.
    pub media: MediaConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for path confinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Directories that requests may read from. Must not be empty.
    pub permitted_roots: PermittedRoots,

    /// Whether a requested path may itself be a symlink.
    /// Symlinks are always resolved before the containment check; when this
    /// is false, a link is rejected even if its target is permitted.
    pub allow_symlinks: bool,
}

/// Configuration for the media decoding collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Program used to probe video containers.
    pub ffprobe_path: PathBuf,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            permitted_roots: PermittedRoots::default(),
            allow_symlinks: true,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "media-info-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_PERMITTED_DIRS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.parse().unwrap_or(true);
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Platform path list, e.g. "/srv/media:/home/me/Pictures"
        if let Some(dirs) = std::env::var_os("MCP_PERMITTED_DIRS") {
            let roots = std::env::split_paths(&dirs).filter(|p| !p.as_os_str().is_empty());
            config.security.permitted_roots = PermittedRoots::new(roots);
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
        }

        if let Some(ffprobe) = std::env::var_os("MCP_FFPROBE_PATH") {
            config.media.ffprobe_path = PathBuf::from(ffprobe);
        }

        config
    }

    /// Replace the permitted roots (e.g. with those given on the command line).
    pub fn with_permitted_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.security.permitted_roots = PermittedRoots::new(roots);
        self
    }

    /// Check the configuration is usable before the server starts.
    ///
    /// The server refuses to start without at least one permitted directory.
    pub fn validate(&self) -> Result<()> {
        let roots = &self.security.permitted_roots;
        if roots.is_empty() {
            return Err(Error::config(
                "at least one permitted directory is required \
                 (use --permitted <DIR>... or MCP_PERMITTED_DIRS)",
            ));
        }

        for root in roots.iter() {
            if root.is_dir() {
                info!("Permitted directory: {}", root.display());
            } else {
                warn!(
                    "Permitted directory {} does not exist or is not a directory",
                    root.display()
                );
            }
        }

        if !self.security.allow_symlinks {
            info!("Symlinked paths will be rejected");
        }

        Ok(())
    }
}
