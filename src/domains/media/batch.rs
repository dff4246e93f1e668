//! Per-path batch processing.
//!
//! Every requested path is validated by the path guard and, only when
//! admitted, handed to a [`MediaInspector`]. Failures never abort the batch:
//! each one becomes an [`ItemError`] in the slot of the path that caused it.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{ErrorKind, MediaError};
use crate::core::config::Config;
use crate::core::security::validate_path;

/// A read-only metadata lookup for one kind of media.
///
/// Implementations are only ever called with a path the guard admitted.
pub trait MediaInspector {
    /// The metadata record produced on success.
    type Info: Serialize;

    /// Inspect the file at `resolved`, the canonical path of `requested`.
    fn inspect(&self, requested: &str, resolved: &Path) -> Result<Self::Info, MediaError>;
}

/// Result for a single requested path.
///
/// Serialized untagged, so clients see either the metadata record or
/// `{path, error_kind, error}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ItemOutcome<T> {
    Success(T),
    Failure(ItemError),
}

/// Error record for a path that could not be inspected.
#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    pub path: String,
    pub error_kind: ErrorKind,
    pub error: String,
}

impl ItemError {
    pub fn new(path: impl Into<String>, error: &MediaError) -> Self {
        Self {
            path: path.into(),
            error_kind: error.kind(),
            error: error.to_string(),
        }
    }
}

impl<T> ItemOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&ItemError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }
}

/// Inspect `paths` in order; the output has one entry per input.
pub fn inspect_all<I: MediaInspector>(
    paths: &[String],
    config: &Config,
    inspector: &I,
) -> Vec<ItemOutcome<I::Info>> {
    paths
        .iter()
        .map(|path| inspect_one(path, config, inspector))
        .collect()
}

fn inspect_one<I: MediaInspector>(
    path: &str,
    config: &Config,
    inspector: &I,
) -> ItemOutcome<I::Info> {
    let result = validate_path(path, config)
        .map_err(MediaError::from)
        .and_then(|resolved| {
            debug!("Admitted {} as {}", path, resolved.display());
            inspector.inspect(path, &resolved)
        });

    match result {
        Ok(info) => ItemOutcome::Success(info),
        Err(e) => {
            warn!("Skipping {}: {}", path, e);
            ItemOutcome::Failure(ItemError::new(path, &e))
        }
    }
}

/// Counts of successes and failures in a batch, for the text summary.
pub fn tally<T>(outcomes: &[ItemOutcome<T>]) -> (usize, usize) {
    let ok = outcomes.iter().filter(|o| o.is_success()).count();
    (ok, outcomes.len() - ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records every path it is asked to inspect.
    #[derive(Default)]
    struct RecordingInspector {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl MediaInspector for RecordingInspector {
        type Info = String;

        fn inspect(&self, requested: &str, resolved: &Path) -> Result<String, MediaError> {
            self.calls.borrow_mut().push(resolved.to_path_buf());
            if requested.ends_with(".bad") {
                return Err(MediaError::decode(resolved, "not a media file"));
            }
            Ok(requested.to_string())
        }
    }

    fn config_for(root: &Path) -> Config {
        Config::default().with_permitted_roots([root])
    }

    fn as_string(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_batch_preserves_length_and_order() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let good = root.path().join("a.jpg");
        let bad = root.path().join("b.bad");
        let denied = outside.path().join("c.jpg");
        fs::write(&good, "x").unwrap();
        fs::write(&bad, "x").unwrap();
        fs::write(&denied, "x").unwrap();

        let paths = vec![
            as_string(&denied),
            as_string(&good),
            as_string(&root.path().join("missing.jpg")),
            as_string(&bad),
            String::new(),
        ];

        let config = config_for(root.path());
        let inspector = RecordingInspector::default();
        let outcomes = inspect_all(&paths, &config, &inspector);

        assert_eq!(outcomes.len(), paths.len());
        assert_eq!(
            outcomes.iter().map(|o| o.error().map(|e| e.error_kind)).collect::<Vec<_>>(),
            vec![
                Some(ErrorKind::AccessDenied),
                None,
                Some(ErrorKind::NotFound),
                Some(ErrorKind::DecodeError),
                Some(ErrorKind::NotFound),
            ]
        );

        for (outcome, path) in outcomes.iter().zip(&paths) {
            match outcome {
                ItemOutcome::Success(info) => assert_eq!(info, path),
                ItemOutcome::Failure(err) => assert_eq!(&err.path, path),
            }
        }
        assert_eq!(tally(&outcomes), (1, 4));
    }

    #[test]
    fn test_inspector_only_sees_admitted_paths() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let good = root.path().join("a.jpg");
        let denied = outside.path().join("b.jpg");
        fs::write(&good, "x").unwrap();
        fs::write(&denied, "x").unwrap();

        let paths = vec![
            as_string(&denied),
            as_string(&root.path().join("missing.jpg")),
            as_string(&good),
        ];

        let inspector = RecordingInspector::default();
        inspect_all(&paths, &config_for(root.path()), &inspector);

        assert_eq!(
            inspector.calls.into_inner(),
            vec![good.canonicalize().unwrap()]
        );
    }

    #[test]
    fn test_failure_serializes_as_error_record() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let denied = outside.path().join("pic.jpg");
        fs::write(&denied, "x").unwrap();

        let paths = vec![as_string(&denied)];
        let outcomes = inspect_all(
            &paths,
            &config_for(root.path()),
            &RecordingInspector::default(),
        );

        let value = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(value[0]["path"], paths[0]);
        assert_eq!(value[0]["error"], "Path not allowed");
        assert_eq!(value[0]["error_kind"], "access_denied");
    }

    #[test]
    fn test_empty_batch() {
        let root = TempDir::new().unwrap();
        let outcomes = inspect_all(&[], &config_for(root.path()), &RecordingInspector::default());
        assert!(outcomes.is_empty());
        assert_eq!(tally(&outcomes), (0, 0));
    }
}
