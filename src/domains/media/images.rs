//! Still image inspection using the `image` crate.
//!
//! Only the header is decoded: dimensions and colour type come from the
//! format decoder without reading pixel data.

use std::fs;
use std::path::Path;

use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use serde::Serialize;
use tracing::debug;

use super::batch::MediaInspector;
use super::density;
use super::error::MediaError;

/// Metadata reported for one image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub path: String,
    /// Container format, e.g. "JPEG", "PNG".
    pub format: String,
    /// Colour mode, e.g. "RGB", "RGBA", "L".
    pub mode: String,
    pub width: u32,
    pub height: u32,
    /// Dots per inch (x, y), when the file declares a physical size.
    pub resolution: Option<[f64; 2]>,
    /// File size in bytes.
    pub size: u64,
    pub filename: String,
}

/// Reads image headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageInspector;

impl MediaInspector for ImageInspector {
    type Info = ImageInfo;

    fn inspect(&self, requested: &str, resolved: &Path) -> Result<ImageInfo, MediaError> {
        if !resolved.is_file() {
            return Err(MediaError::decode(resolved, "not a regular file"));
        }

        let reader = ImageReader::open(resolved)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| MediaError::decode(resolved, e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| MediaError::decode(resolved, "unrecognized image format"))?;

        let decoder = reader
            .into_decoder()
            .map_err(|e| MediaError::decode(resolved, e.to_string()))?;
        let (width, height) = decoder.dimensions();
        let mode = color_mode(decoder.color_type());

        let size = fs::metadata(resolved)
            .map_err(|e| MediaError::decode(resolved, e.to_string()))?
            .len();

        let resolution = density::read_dpi(resolved, format).unwrap_or_else(|e| {
            debug!("No density header in {}: {}", resolved.display(), e);
            None
        });

        Ok(ImageInfo {
            path: requested.to_string(),
            format: format_name(format),
            mode,
            width,
            height,
            resolution,
            size,
            filename: file_name(requested),
        })
    }
}

/// Conventional upper-case name of an image format.
pub fn format_name(format: ImageFormat) -> String {
    let name = match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Pnm => "PPM",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Tga => "TGA",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "OPENEXR",
        ImageFormat::Qoi => "QOI",
        ImageFormat::Avif => "AVIF",
        other => return format!("{other:?}").to_uppercase(),
    };
    name.to_string()
}

/// Colour mode name for a decoded colour type.
pub fn color_mode(color: ColorType) -> String {
    let mode = match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        other => return format!("{other:?}"),
    };
    mode.to_string()
}

fn file_name(requested: &str) -> String {
    Path::new(requested)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};
    use tempfile::TempDir;

    fn inspect(path: &Path) -> Result<ImageInfo, MediaError> {
        let requested = path.to_string_lossy().to_string();
        ImageInspector.inspect(&requested, path)
    }

    #[test]
    fn test_jpeg_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pic.jpg");
        RgbImage::new(64, 48).save(&path).unwrap();

        let info = inspect(&path).unwrap();
        assert_eq!(info.format, "JPEG");
        assert_eq!(info.mode, "RGB");
        assert_eq!((info.width, info.height), (64, 48));
        assert_eq!(info.filename, "pic.jpg");
        assert_eq!(info.size, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_png_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("alpha.png");
        RgbaImage::new(5, 7).save(&path).unwrap();

        let info = inspect(&path).unwrap();
        assert_eq!(info.format, "PNG");
        assert_eq!(info.mode, "RGBA");
        assert_eq!((info.width, info.height), (5, 7));
        assert_eq!(info.resolution, None);
    }

    #[test]
    fn test_grayscale_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gray.png");
        GrayImage::new(3, 3).save(&path).unwrap();

        assert_eq!(inspect(&path).unwrap().mode, "L");
    }

    #[test]
    fn test_format_detected_from_content_not_extension() {
        let temp_dir = TempDir::new().unwrap();
        let png = temp_dir.path().join("real.png");
        RgbImage::new(2, 2).save(&png).unwrap();
        let misnamed = temp_dir.path().join("misnamed.jpg");
        fs::copy(&png, &misnamed).unwrap();

        assert_eq!(inspect(&misnamed).unwrap().format, "PNG");
    }

    #[test]
    fn test_not_an_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "just some text").unwrap();

        let err = inspect(&path).unwrap_err();
        assert!(matches!(err, MediaError::Decode { .. }));
    }

    #[test]
    fn test_directory_is_not_an_image() {
        let temp_dir = TempDir::new().unwrap();
        let err = inspect(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_filename_comes_from_requested_path() {
        assert_eq!(file_name("/srv/media/holiday/pic.jpg"), "pic.jpg");
        assert_eq!(file_name("pic.jpg"), "pic.jpg");
        assert_eq!(file_name("/"), "");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(format_name(ImageFormat::Jpeg), "JPEG");
        assert_eq!(format_name(ImageFormat::WebP), "WEBP");
    }
}
