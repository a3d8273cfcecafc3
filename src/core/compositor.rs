//! Cell compositor: load, orient, crop-to-fill, resize, paste
//!
//! Photos are cropped to the cell aspect ratio (never letterboxed), so
//! every placed cell is fully covered.

use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use log::{debug, trace};
use std::path::Path;

use super::error::CollageError;
use super::grid::{CellPlacement, GridGeometry};

/// Canvas background (white)
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Source rectangle kept by the center crop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Center crop of a `src_w x src_h` image to the `cell_w : cell_h` aspect ratio.
///
/// Wider than the cell: equal left/right margins are dropped, full height kept.
/// Otherwise: equal top/bottom margins are dropped, full width kept.
/// Integer math throughout; each side is at least 1 px.
pub fn center_crop_rect(src_w: u32, src_h: u32, cell_w: u32, cell_h: u32) -> CropRect {
    let (w, h) = (src_w as u64, src_h as u64);
    let (cw, ch) = (cell_w.max(1) as u64, cell_h.max(1) as u64);

    if w * ch > h * cw {
        let new_w = (h * cw / ch).clamp(1, w) as u32;
        CropRect {
            x: (src_w - new_w) / 2,
            y: 0,
            width: new_w,
            height: src_h,
        }
    } else {
        let new_h = (w * ch / cw).clamp(1, h) as u32;
        CropRect {
            x: 0,
            y: (src_h - new_h) / 2,
            width: src_w,
            height: new_h,
        }
    }
}

/// Decode an image and apply its stored EXIF orientation.
pub fn load_oriented(path: &Path) -> Result<DynamicImage, CollageError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;

    // Missing or unreadable orientation metadata is not an error
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder)?;

    if orientation != Orientation::NoTransforms {
        trace!("Applying orientation {:?} to {}", orientation, path.display());
        img.apply_orientation(orientation);
    }

    Ok(img)
}

/// Crop to the cell aspect ratio, convert to 8-bit RGB and resample to exactly `cell_w x cell_h`.
pub fn fit_to_cell(img: &DynamicImage, cell_w: u32, cell_h: u32) -> Result<RgbImage, CollageError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(CollageError::EmptyImage);
    }

    let rect = center_crop_rect(img.width(), img.height(), cell_w, cell_h);
    let cropped = img.crop_imm(rect.x, rect.y, rect.width, rect.height).to_rgb8();

    if cropped.dimensions() == (cell_w, cell_h) {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, cell_w, cell_h, FilterType::Lanczos3))
}

/// Blank canvas filled with the background colour
pub fn new_canvas(geometry: &GridGeometry, background: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(geometry.canvas_width, geometry.canvas_height, Rgb(background))
}

/// Load one photo and paste it into its cell.
///
/// On error the canvas is left untouched.
pub fn place_photo(canvas: &mut RgbImage, path: &Path, placement: CellPlacement) -> Result<(), CollageError> {
    let img = load_oriented(path)?;
    debug!(
        "{}: {}x{} -> cell {}x{} at ({}, {})",
        path.display(),
        img.width(),
        img.height(),
        placement.width,
        placement.height,
        placement.x,
        placement.y
    );

    let cell = fit_to_cell(&img, placement.width, placement.height)?;
    imageops::replace(canvas, &cell, placement.x as i64, placement.y as i64);
    Ok(())
}
