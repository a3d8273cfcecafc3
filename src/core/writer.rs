//! Collage writer: canvas -> JPEG on disk

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::error::CollageError;

/// Default JPEG quality for collages
pub const DEFAULT_QUALITY: u8 = 95;

/// Output file name for a collage covering photos `first..=last`
///
/// `collage_file_name("collage", 1, 100)` -> `collage_0001-0100.jpg`
pub fn collage_file_name(prefix: &str, first: u32, last: u32) -> String {
    format!("{}_{:04}-{:04}.jpg", prefix, first, last)
}

/// Encode `canvas` as JPEG at `quality` (1-100), overwriting `path`.
///
/// Creates the parent directory if needed. Returns the written size in bytes.
pub fn write_collage(canvas: &RgbImage, path: &Path, quality: u8) -> Result<u64, CollageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(canvas)?;
    out.flush()?;
    drop(out);

    let size = std::fs::metadata(path)?.len();
    info!("Wrote {} ({} bytes, quality {})", path.display(), size, quality);
    Ok(size)
}

/// Bytes -> megabytes for display
pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
