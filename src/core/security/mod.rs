// Security module for path confinement
//
// Every filesystem read made on behalf of a client goes through the path
// guard first: the requested path must exist and must resolve inside one of
// the permitted root directories.

pub mod path_guard;

pub use path_guard::{
    PathSecurityError, PermittedRoots, ensure_exists, is_within_permitted_roots, validate,
    validate_path,
};
