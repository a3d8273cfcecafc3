//! Grid assignment: photo number -> (collage, row, column) -> pixel offset
//!
//! Every collage is a fixed 10x10 grid. Photo numbers are 1-based and fill
//! collages in order: 1..=100 go to collage 1, 101..=200 to collage 2, etc.
//! Within a collage cells are filled row by row, left to right.
//!
//! # Geometry
//!
//! ```text
//! |pad|cell|border|cell|border| ... |cell|pad|(leftover)
//! ```
//!
//! Cell size is computed once per axis with truncating division, so any
//! leftover pixels end up in the right/bottom margin.

use super::error::CollageError;

/// Columns per collage (fixed)
pub const GRID_COLS: u32 = 10;
/// Rows per collage (fixed)
pub const GRID_ROWS: u32 = 10;
/// Photos per collage
pub const PHOTOS_PER_COLLAGE: u32 = GRID_COLS * GRID_ROWS;

/// Position of a photo inside the collage set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSlot {
    /// 1-based collage number
    pub collage: u32,
    pub row: u32,
    pub col: u32,
}

/// Pixel rectangle of a cell on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map a 1-based photo number to its collage/row/column.
///
/// Returns None for 0 (numbers start at 1).
pub fn slot(number: u32) -> Option<GridSlot> {
    let index = number.checked_sub(1)?;
    let position = index % PHOTOS_PER_COLLAGE;
    Some(GridSlot {
        collage: index / PHOTOS_PER_COLLAGE + 1,
        row: position / GRID_COLS,
        col: position % GRID_COLS,
    })
}

/// Inclusive photo-number range covered by a 1-based collage number
pub fn collage_range(collage: u32) -> (u32, u32) {
    let first = collage.saturating_sub(1) * PHOTOS_PER_COLLAGE + 1;
    (first, first + PHOTOS_PER_COLLAGE - 1)
}

/// Fixed canvas geometry with derived cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub border: u32,
    pub padding: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridGeometry {
    /// Derive cell size from canvas size, border width and outer padding.
    ///
    /// Fails if the canvas cannot fit cells of at least 1x1 px.
    pub fn new(canvas_width: u32, canvas_height: u32, border: u32, padding: u32) -> Result<Self, CollageError> {
        let cell_width = cell_extent(canvas_width, GRID_COLS, border, padding)
            .ok_or_else(|| CollageError::Config(format!(
                "canvas width {} too small for {} columns (border {}, padding {})",
                canvas_width, GRID_COLS, border, padding
            )))?;
        let cell_height = cell_extent(canvas_height, GRID_ROWS, border, padding)
            .ok_or_else(|| CollageError::Config(format!(
                "canvas height {} too small for {} rows (border {}, padding {})",
                canvas_height, GRID_ROWS, border, padding
            )))?;

        Ok(Self {
            canvas_width,
            canvas_height,
            border,
            padding,
            cell_width,
            cell_height,
        })
    }

    /// Top-left pixel of the cell at (row, col)
    pub fn offset(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.padding + col * (self.cell_width + self.border),
            self.padding + row * (self.cell_height + self.border),
        )
    }

    pub fn placement(&self, slot: GridSlot) -> CellPlacement {
        let (x, y) = self.offset(slot.row, slot.col);
        CellPlacement {
            x,
            y,
            width: self.cell_width,
            height: self.cell_height,
        }
    }
}

/// (total - (count-1)*border - 2*padding) / count, None if that is < 1
fn cell_extent(total: u32, count: u32, border: u32, padding: u32) -> Option<u32> {
    let gaps = (count - 1).checked_mul(border)?;
    let margins = padding.checked_mul(2)?;
    let available = total.checked_sub(gaps)?.checked_sub(margins)?;
    let extent = available / count;
    (extent > 0).then_some(extent)
}
