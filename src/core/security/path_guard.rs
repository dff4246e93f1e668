use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::Config;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("Path not allowed")]
    AccessDenied { path: PathBuf },
}

impl PathSecurityError {
    /// The path the caller asked for, as it was supplied.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::AccessDenied { path } => path,
        }
    }
}

/// The directories a request may read from.
///
/// Built once from configuration at startup and never mutated afterwards;
/// tools receive it through the shared `Arc<Config>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermittedRoots(Vec<PathBuf>);

impl PermittedRoots {
    /// Create a root list, keeping the order in which roots were given.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(roots.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }

    /// See [`validate`].
    pub fn validate(&self, input_path: &str) -> Result<PathBuf, PathSecurityError> {
        validate(input_path, &self.0)
    }
}

/// Checks that `path` refers to an existing filesystem entry.
///
/// The check follows symlinks, so a dangling link does not exist.
pub fn ensure_exists(path: &Path) -> Result<(), PathSecurityError> {
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(PathSecurityError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Returns true if `path` resolves to one of `roots` or to something below one.
///
/// Both sides are brought to their canonical absolute form first (see
/// [`canonical_form`]), then compared component by component: root
/// `/data/a` never admits `/data/ab`. A root that cannot be compared with
/// the candidate, e.g. one on another volume, is skipped.
pub fn is_within_permitted_roots<P: AsRef<Path>>(path: &Path, roots: &[P]) -> bool {
    let candidate = canonical_form(path);
    is_under_any_root(&candidate, roots)
}

/// Admits `input_path` for reading.
///
/// 1. The path must exist, otherwise [`PathSecurityError::NotFound`]
/// 2. Its real path (symlinks resolved) must lie under a permitted root,
///    otherwise [`PathSecurityError::AccessDenied`]
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonical path, which is what callers must open
/// * `Err(PathSecurityError)` - If validation fails
pub fn validate<P: AsRef<Path>>(
    input_path: &str,
    roots: &[P],
) -> Result<PathBuf, PathSecurityError> {
    admit(Path::new(input_path), roots, true)
}

/// Validates a requested path against the configured security settings.
///
/// Same as [`validate`] with the configured roots, plus the symlink policy:
/// when `allow_symlinks` is off, a path that is itself a symbolic link is
/// denied even if its target is inside a root.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let safe_path = validate_path("/srv/media/pic.jpg", &config)?;
/// ```
pub fn validate_path(input_path: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let security = &config.security;
    admit(
        Path::new(input_path),
        security.permitted_roots.as_slice(),
        security.allow_symlinks,
    )
}

fn admit<P: AsRef<Path>>(
    path: &Path,
    roots: &[P],
    allow_symlinks: bool,
) -> Result<PathBuf, PathSecurityError> {
    ensure_exists(path)?;

    if !allow_symlinks && path.is_symlink() {
        debug!(path = %path.display(), "Rejecting symlink (symlinks disabled)");
        return Err(PathSecurityError::AccessDenied {
            path: path.to_path_buf(),
        });
    }

    // Removed between the stat and here.
    let canonical = path
        .canonicalize()
        .map_err(|_| PathSecurityError::NotFound {
            path: path.to_path_buf(),
        })?;

    if !is_under_any_root(&canonical, roots) {
        return Err(PathSecurityError::AccessDenied {
            path: path.to_path_buf(),
        });
    }

    Ok(canonical)
}

fn is_under_any_root<P: AsRef<Path>>(candidate: &Path, roots: &[P]) -> bool {
    any_root_contains(candidate, roots.iter().map(|root| canonical_form(root.as_ref())))
}

/// `roots` must already be in canonical form. A root that cannot be
/// compared with `candidate` is skipped and the next one is tried.
fn any_root_contains<I>(candidate: &Path, roots: I) -> bool
where
    I: IntoIterator<Item = PathBuf>,
{
    roots.into_iter().any(|root| match common_path(&root, candidate) {
        Some(common) => common == root,
        None => {
            debug!(
                root = %root.display(),
                candidate = %candidate.display(),
                "Root not comparable with candidate, skipping"
            );
            false
        }
    })
}

/// Absolute, normalized form of `path` with symlinks resolved.
///
/// An existing path is resolved by the OS. For a missing one, `.` and `..`
/// are folded lexically and the deepest existing ancestor is resolved, so
/// the result is still comparable with canonical roots.
fn canonical_form(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let normalized = normalize_lexically(&absolute);

    let mut missing = Vec::new();
    let mut current = normalized.as_path();
    loop {
        if let Ok(mut resolved) = current.canonicalize() {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return normalized,
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Longest common path of `a` and `b`, on component boundaries.
///
/// `None` when the two cannot be compared: one is absolute and the other is
/// not, or they sit on different volume prefixes.
fn common_path(a: &Path, b: &Path) -> Option<PathBuf> {
    if a.is_absolute() != b.is_absolute() {
        return None;
    }

    let mut common = PathBuf::new();
    for (left, right) in a.components().zip(b.components()) {
        if left != right {
            if matches!((left, right), (Component::Prefix(_), Component::Prefix(_))) {
                return None;
            }
            break;
        }
        common.push(left);
    }
    Some(common)
}
