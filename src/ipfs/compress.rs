//! Image downscaling before upload.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::config::CompressionConfig;
use crate::ipfs::types::FileUpload;

/// Raster images above the threshold are downscaled; vector images never are.
pub fn should_compress(file: &FileUpload, config: &CompressionConfig) -> bool {
    config.enabled
        && file.mime.starts_with("image/")
        && file.mime != "image/svg+xml"
        && file.size() > config.threshold_bytes
}

/// Dimensions that fit within a `max`×`max` box, keeping the aspect ratio.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = |long: u32, short: u32| -> u32 {
        ((short as f64) * (max as f64) / (long as f64)).round().max(1.0) as u32
    };
    if width > height {
        if width > max {
            return (max, scale(width, height));
        }
    } else if height > max {
        return (scale(height, width), max);
    }
    (width, height)
}

/// Re-encode `file` as a downscaled JPEG. The name is kept.
pub fn compress_image(file: &FileUpload, config: &CompressionConfig) -> Result<FileUpload, image::ImageError> {
    let img = image::load_from_memory(&file.bytes)?;
    let (width, height) = fit_within(img.width(), img.height(), config.max_dimension);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, config.jpeg_quality).encode_image(&rgb)?;

    Ok(FileUpload {
        name: file.name.clone(),
        mime: "image/jpeg".to_string(),
        bytes: out.into_inner(),
        modified_ms: file.modified_ms,
    })
}
