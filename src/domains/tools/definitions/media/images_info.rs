//! Image info tool definition.
//!
//! Reads format, colour mode, dimensions, resolution and size for a batch
//! of image files. Files are never modified.

use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};

use futures::FutureExt;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{ItemSummary, batch_result, read_only_annotations, run_blocking};
use crate::core::config::Config;
use crate::domains::media::{ImageInfo, ImageInspector, inspect_all};

#[cfg(feature = "http")]
use super::common::{http_response, parse_http_params};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the image info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetImagesInfoParams {
    /// Absolute or relative paths to image files (JPEG, PNG, GIF, TIFF, WebP, BMP, ...).
    /// Each path must be inside one of the server's permitted directories.
    pub image_paths: Vec<String>,
}

impl ItemSummary for ImageInfo {
    fn summary(&self) -> String {
        format!(
            "{}: {} {}x{} {} ({} bytes)",
            self.path, self.format, self.width, self.height, self.mode, self.size
        )
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Image info tool - reads image metadata for a list of paths.
pub struct GetImagesInfoTool;

impl GetImagesInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_images_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Returns metadata about multiple image files: format, colour mode, \
         width, height, resolution (DPI), file size and file name.\n\
         \n\
         Results are returned in the same order as the input paths. A path that does not exist, \
         lies outside the permitted directories, or cannot be decoded yields an entry with \
         'path' and 'error' instead of failing the whole call.\n\
         \n\
         No image processing or modification is performed on the files.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(count = params.image_paths.len()))]
    pub fn execute(params: &GetImagesInfoParams, config: &Config) -> CallToolResult {
        info!("Image info tool called for {} path(s)", params.image_paths.len());

        let outcomes = inspect_all(&params.image_paths, config, &ImageInspector);

        batch_result("image", &outcomes)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetImagesInfoParams = parse_http_params(arguments)?;

        info!("Image info tool (HTTP) called");

        http_response(&Self::execute(&params, &config))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetImagesInfoParams>().into(),
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
                let params: GetImagesInfoParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> Config {
        Config::default().with_permitted_roots([root])
    }

    fn as_string(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn results(result: &CallToolResult) -> &Vec<serde_json::Value> {
        result
            .structured_content
            .as_ref()
            .and_then(|s| s["results"].as_array())
            .expect("structured results")
    }

    #[test]
    fn test_valid_jpeg_in_permitted_root() {
        let root = TempDir::new().unwrap();
        let pic = root.path().join("pic.jpg");
        RgbImage::new(320, 200).save(&pic).unwrap();

        let params = GetImagesInfoParams {
            image_paths: vec![as_string(&pic)],
        };
        let result = GetImagesInfoTool::execute(&params, &config_for(root.path()));
        assert_eq!(result.is_error, Some(false));

        let entry = &results(&result)[0];
        assert_eq!(entry["path"], params.image_paths[0]);
        assert_eq!(entry["format"], "JPEG");
        assert_eq!(entry["width"], 320);
        assert_eq!(entry["height"], 200);
        assert_eq!(entry["filename"], "pic.jpg");
        assert!(entry.get("error").is_none());
    }

    #[test]
    fn test_path_outside_root_not_allowed() {
        let root = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let pic = other.path().join("pic.jpg");
        RgbImage::new(4, 4).save(&pic).unwrap();

        let params = GetImagesInfoParams {
            image_paths: vec![as_string(&pic)],
        };
        let result = GetImagesInfoTool::execute(&params, &config_for(root.path()));

        let entry = &results(&result)[0];
        assert_eq!(entry["path"], params.image_paths[0]);
        assert_eq!(entry["error"], "Path not allowed");
        assert_eq!(entry["error_kind"], "access_denied");
    }

    #[test]
    fn test_missing_file_not_found() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("missing.jpg");

        let params = GetImagesInfoParams {
            image_paths: vec![as_string(&missing)],
        };
        let result = GetImagesInfoTool::execute(&params, &config_for(root.path()));

        let entry = &results(&result)[0];
        assert_eq!(entry["error_kind"], "not_found");
        assert!(entry["error"].as_str().unwrap().contains("does not exist"));
    }

    #[test]
    fn test_mixed_batch_keeps_order() {
        let root = TempDir::new().unwrap();
        let pic = root.path().join("pic.png");
        RgbImage::new(8, 8).save(&pic).unwrap();
        let broken = root.path().join("broken.png");
        fs::write(&broken, "not an image").unwrap();

        let params = GetImagesInfoParams {
            image_paths: vec![as_string(&pic), as_string(&broken)],
        };
        let result = GetImagesInfoTool::execute(&params, &config_for(root.path()));

        let entries = results(&result);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["format"], "PNG");
        assert_eq!(entries[1]["path"], params.image_paths[1]);
        assert_eq!(entries[1]["error_kind"], "decode_error");

        let text = match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        };
        assert!(text.starts_with("2 image(s): 1 succeeded, 1 failed"));
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = GetImagesInfoTool::to_tool();
        assert_eq!(tool.name, "get_images_info");
        assert_eq!(
            tool.annotations.and_then(|a| a.read_only_hint),
            Some(true)
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_missing_param() {
        let root = TempDir::new().unwrap();
        let args = serde_json::json!({ "paths": [] });

        let result = GetImagesInfoTool::http_handler(args, Arc::new(config_for(root.path())));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_returns_structured_content() {
        let root = TempDir::new().unwrap();
        let pic = root.path().join("pic.png");
        RgbImage::new(2, 3).save(&pic).unwrap();

        let args = serde_json::json!({ "image_paths": [as_string(&pic)] });
        let value =
            GetImagesInfoTool::http_handler(args, Arc::new(config_for(root.path()))).unwrap();
        assert_eq!(value["structuredContent"]["results"][0]["height"], 3);
    }
}
