//! Media-specific error types.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Errors that can occur while inspecting a single media file.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The path guard refused the path.
    #[error(transparent)]
    Path(#[from] PathSecurityError),

    /// The decoding library could not read the file.
    #[error("Failed to decode '{path}': {message}")]
    Decode { path: PathBuf, message: String },
}

/// Machine-readable classification carried by every per-item error record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    DecodeError,
}

impl MediaError {
    /// Create a new decode error for `path`.
    pub fn decode(path: &Path, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Path(PathSecurityError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Path(PathSecurityError::AccessDenied { .. }) => ErrorKind::AccessDenied,
            Self::Decode { .. } => ErrorKind::DecodeError,
        }
    }
}
