pub mod common;
pub mod images_info;
pub mod videos_info;

pub use images_info::{GetImagesInfoParams, GetImagesInfoTool};
pub use videos_info::{GetVideosInfoParams, GetVideosInfoTool};
