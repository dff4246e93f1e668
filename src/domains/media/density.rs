//! Physical resolution (DPI) declared by an image.
//!
//! `image` does not surface pixel density, so it is taken from the format
//! decoders it is built on: zune-jpeg's JFIF header for JPEG and the `pHYs`
//! chunk as reported by `png`. Other formats report no resolution.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use image::ImageFormat;
use png::{PixelDimensions, Unit};
use zune_jpeg::JpegDecoder;

const CM_PER_INCH: f64 = 2.54;
const METRES_PER_INCH: f64 = 0.0254;

// JFIF density units
const JFIF_DOTS_PER_INCH: u8 = 1;
const JFIF_DOTS_PER_CM: u8 = 2;

/// Horizontal and vertical dots per inch, if the file declares them.
pub fn read_dpi(path: &Path, format: ImageFormat) -> io::Result<Option<[f64; 2]>> {
    match format {
        ImageFormat::Jpeg => jpeg_dpi(&fs::read(path)?),
        ImageFormat::Png => png_dpi(BufReader::new(File::open(path)?)),
        _ => Ok(None),
    }
}

fn jpeg_dpi(bytes: &[u8]) -> io::Result<Option<[f64; 2]>> {
    let mut decoder = JpegDecoder::new(bytes);
    decoder
        .decode_headers()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")))?;

    let Some(info) = decoder.info() else {
        return Ok(None);
    };
    let (x, y) = (f64::from(info.x_density), f64::from(info.y_density));

    Ok(match info.pixel_density {
        JFIF_DOTS_PER_INCH => Some([x, y]),
        JFIF_DOTS_PER_CM => Some([x * CM_PER_INCH, y * CM_PER_INCH]),
        // Aspect ratio only
        _ => None,
    })
}

fn png_dpi<R: io::Read>(reader: R) -> io::Result<Option<[f64; 2]>> {
    let reader = png::Decoder::new(reader)
        .read_info()
        .map_err(io::Error::other)?;

    Ok(match reader.info().pixel_dims {
        Some(PixelDimensions {
            xppu,
            yppu,
            unit: Unit::Meter,
        }) => Some([
            f64::from(xppu) * METRES_PER_INCH,
            f64::from(yppu) * METRES_PER_INCH,
        ]),
        _ => None,
    })
}
