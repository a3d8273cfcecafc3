//! GRIDCOLLAGE - batch photo collage library
//!
//! Re-exports all modules for use by the binary target.

// Collage pipeline (locate, grid, composite, write, run)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod progress;
pub mod report;

// Re-export commonly used types from core
pub use self::core::error::CollageError;
pub use self::core::grid::{GridGeometry, GridSlot, PHOTOS_PER_COLLAGE};
pub use self::core::locator::{PhotoIndex, PhotoRecord, locate_photos};
pub use self::core::runner::{BatchReport, CollageBatch, CollageReport};
