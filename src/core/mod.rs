//! Core pipeline modules - locator, grid, compositor, writer, runner
//!
//! locator, grid, compositor and writer do the image work and know nothing
//! about settings files or the console. runner ties them together and takes
//! `CollageSettings` plus a `CollageProgress` from the app layer.

pub mod compositor;
pub mod error;
pub mod grid;
pub mod locator;
pub mod runner;
pub mod writer;

// Re-exports for convenience
pub use compositor::{CropRect, center_crop_rect, place_photo};
pub use error::CollageError;
pub use grid::{CellPlacement, GridGeometry, GridSlot};
pub use locator::{PhotoIndex, PhotoRecord, locate_photos};
pub use runner::{BatchReport, CollageBatch, CollageReport, FailureKind, PhotoFailure};
pub use writer::{collage_file_name, write_collage};
