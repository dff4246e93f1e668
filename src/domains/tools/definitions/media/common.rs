//! Common utilities shared across the media tools.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content, ToolAnnotations},
};
use serde::Serialize;
use tracing::warn;

use crate::domains::media::{ItemOutcome, tally};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// One-line description of a successful lookup, used in the text summary.
pub trait ItemSummary {
    fn summary(&self) -> String;
}

/// Both media tools only read files.
pub fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(true)
        .destructive(false)
        .idempotent(true)
        .open_world(false)
}

/// Build the tool result for a batch.
///
/// The text content is a short summary, one line per path; the full
/// records go in `structuredContent` under `results`, in input order.
pub fn batch_result<T>(noun: &str, outcomes: &[ItemOutcome<T>]) -> CallToolResult
where
    T: Serialize + ItemSummary,
{
    let (ok, failed) = tally(outcomes);
    let mut summary = format!(
        "{} {}(s): {} succeeded, {} failed",
        outcomes.len(),
        noun,
        ok,
        failed
    );
    for outcome in outcomes {
        let line = match outcome {
            ItemOutcome::Success(info) => info.summary(),
            ItemOutcome::Failure(err) => format!("{}: {}", err.path, err.error),
        };
        summary.push_str("\n- ");
        summary.push_str(&line);
    }

    match serde_json::to_value(outcomes) {
        Ok(results) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(serde_json::json!({ "results": results })),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            // Fallback to text-only
            CallToolResult::success(vec![Content::text(summary)])
        }
    }
}

/// Run a tool's `execute` on the blocking pool.
///
/// Inspection stats files, decodes headers and waits on ffprobe; none of it
/// may hold a runtime worker.
pub async fn run_blocking<F>(execute: F) -> Result<CallToolResult, McpError>
where
    F: FnOnce() -> CallToolResult + Send + 'static,
{
    tokio::task::spawn_blocking(execute)
        .await
        .map_err(|e| McpError::internal_error(format!("Task execution failed: {}", e), None))
}

/// Parse HTTP tool arguments into the tool's params type.
#[cfg(feature = "http")]
pub fn parse_http_params<P: serde::de::DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<P, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Render a tool result the way the HTTP transport returns it.
#[cfg(feature = "http")]
pub fn http_response(result: &CallToolResult) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::media::{ErrorKind, ItemError};

    #[derive(Serialize)]
    struct Dummy(&'static str);

    impl ItemSummary for Dummy {
        fn summary(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_batch_result_summary_and_structure() {
        let outcomes = vec![
            ItemOutcome::Success(Dummy("a.jpg: fine")),
            ItemOutcome::Failure(ItemError {
                path: "b.jpg".to_string(),
                error_kind: ErrorKind::AccessDenied,
                error: "Path not allowed".to_string(),
            }),
        ];

        let result = batch_result("image", &outcomes);
        assert_eq!(result.is_error, Some(false));

        let text = match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        };
        assert!(text.starts_with("2 image(s): 1 succeeded, 1 failed"));
        assert!(text.contains("b.jpg: Path not allowed"));

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["results"].as_array().unwrap().len(), 2);
        assert_eq!(structured["results"][1]["error_kind"], "access_denied");
    }

    #[tokio::test]
    async fn test_run_blocking_keeps_runtime_responsive() {
        use std::time::{Duration, Instant};

        let task = tokio::spawn(run_blocking(|| {
            std::thread::sleep(Duration::from_millis(1000));
            batch_result::<Dummy>("image", &[])
        }));

        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(started.elapsed() < Duration::from_millis(500));

        let result = task.await.unwrap().unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_run_blocking_maps_panic_to_internal_error() {
        let result = run_blocking(|| panic!("decoder exploded")).await;
        let err = result.unwrap_err();
        assert!(err.message.contains("Task execution failed"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_response_is_camel_case() {
        let result = batch_result::<Dummy>("video", &[]);
        let value = http_response(&result).unwrap();
        assert!(value.get("structuredContent").is_some());
        assert_eq!(value["isError"], false);
    }
}
