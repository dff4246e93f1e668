//! Media domain module.
//!
//! Read-only metadata lookups for image and video files. Nothing in here
//! decides whether a path may be read: callers go through
//! [`inspect_all`], which runs the path guard before any inspector sees
//! the file.
//!
//! ## Architecture
//!
//! - `batch.rs` - `MediaInspector` trait and the guard-then-inspect loop
//! - `images.rs` - image headers via the `image` crate
//! - `density.rs` - DPI from JPEG/PNG headers
//! - `videos.rs` - container and stream metadata via ffprobe
//! - `error.rs` - media error types

mod batch;
mod density;
mod error;
pub mod images;
pub mod videos;

pub use batch::{ItemError, ItemOutcome, MediaInspector, inspect_all, tally};
pub use error::{ErrorKind, MediaError};
pub use images::{ImageInfo, ImageInspector};
pub use videos::{VideoInfo, VideoInspector};
