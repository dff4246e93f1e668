//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur when dispatching a tool call.
///
/// Per-path failures are not tool errors: they are reported inside the
/// batch result.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::not_found("get_audio_info").to_string(),
            "Tool not found: get_audio_info"
        );
        assert_eq!(
            ToolError::invalid_arguments("missing field `image_paths`").to_string(),
            "Invalid arguments: missing field `image_paths`"
        );
    }
}
