//! Video info tool definition.
//!
//! Reports container format, streams, duration, bit rate and frame rate for
//! a batch of video files using ffprobe.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{ItemSummary, batch_result, read_only_annotations, run_blocking};
use crate::core::config::Config;
use crate::domains::media::{VideoInfo, VideoInspector, inspect_all};

#[cfg(feature = "http")]
use super::common::{http_response, parse_http_params};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the video info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetVideosInfoParams {
    /// Absolute or relative paths to video files (MP4, MOV, AVI, MKV, WebM, WMV, ...).
    /// Each path must be inside one of the server's permitted directories.
    pub video_paths: Vec<String>,
}

impl ItemSummary for VideoInfo {
    fn summary(&self) -> String {
        let mut line = format!(
            "{}: {:.2}s, {} video / {} audio stream(s)",
            self.path,
            self.duration,
            self.video_streams.len(),
            self.audio_streams.len()
        );
        if let Some(fps) = self.framerate {
            line.push_str(&format!(", {:.3} fps", fps));
        }
        line
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Video info tool - probes video metadata for a list of paths.
pub struct GetVideosInfoTool;

impl GetVideosInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_videos_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Returns metadata about multiple video files: container format, \
         video and audio streams (codecs, resolution, sample rate, ...), duration, file size, \
         bit rate and frame rate.\n\
         \n\
         Results are returned in the same order as the input paths. A path that does not exist, \
         lies outside the permitted directories, or cannot be probed yields an entry with \
         'path' and 'error' instead of failing the whole call.\n\
         \n\
         No video processing or modification is performed on the files.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(count = params.video_paths.len()))]
    pub fn execute(params: &GetVideosInfoParams, config: &Config) -> CallToolResult {
        info!("Video info tool called for {} path(s)", params.video_paths.len());

        let inspector = VideoInspector::new(&config.media.ffprobe_path);
        let outcomes = inspect_all(&params.video_paths, config, &inspector);

        batch_result("video", &outcomes)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetVideosInfoParams = parse_http_params(arguments)?;

        info!("Video info tool (HTTP) called");

        http_response(&Self::execute(&params, &config))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetVideosInfoParams>().into(),
            annotations: Some(read_only_annotations()),
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: GetVideosInfoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                run_blocking(move || Self::execute(&params, &config)).await
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
