//! Grid geometry: canvas settings and pixel <-> grid coordinate transforms.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Number of columns on every lesson page.
pub const GRID_COLUMNS: u32 = 6;
/// Gap between adjacent grid cells, in pixels.
pub const GRID_GAP: f64 = 8.0;
/// Default cell edge length, in pixels.
pub const DEFAULT_GRID_SIZE: f64 = 120.0;

/// A tile footprint in grid units.
///
/// `col + col_span <= GRID_COLUMNS` is enforced by placement validation,
/// not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub col: u32,
    pub row: u32,
    pub col_span: u32,
    pub row_span: u32,
}

impl GridPosition {
    /// Create a new grid rectangle.
    pub const fn new(col: u32, row: u32, col_span: u32, row_span: u32) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }

    /// A single cell at the given column and row.
    pub const fn cell(col: u32, row: u32) -> Self {
        Self::new(col, row, 1, 1)
    }

    /// Exclusive right edge (`col + col_span`).
    pub fn col_end(&self) -> u32 {
        self.col.saturating_add(self.col_span)
    }

    /// Exclusive bottom edge (`row + row_span`).
    pub fn row_end(&self) -> u32 {
        self.row.saturating_add(self.row_span)
    }

    /// Same spans, moved to another cell.
    pub fn at(self, col: u32, row: u32) -> Self {
        Self { col, row, ..self }
    }

    /// Check whether two rectangles share at least one cell.
    ///
    /// Both rectangles are treated as half-open `[col, col_end) x [row, row_end)`.
    pub fn overlaps(&self, other: &GridPosition) -> bool {
        !(self.col_end() <= other.col
            || other.col_end() <= self.col
            || self.row_end() <= other.row
            || other.row_end() <= self.row)
    }
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

/// Per-page canvas configuration supplied by the lesson model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    /// Cell edge length in pixels.
    pub grid_size: f64,
    /// Canvas height in rows. Derived from the tile set, see
    /// [`calculate_canvas_height`](crate::placement::calculate_canvas_height).
    pub height: u32,
    /// Whether free pixel positions are quantized to the grid.
    pub snap_to_grid: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            height: crate::placement::MIN_CANVAS_ROWS,
            snap_to_grid: true,
        }
    }
}

impl CanvasSettings {
    /// Create settings with the given cell size and default height/snapping.
    pub fn with_grid_size(grid_size: f64) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Pixel span of one column or row including the gap.
    pub fn cell_unit(&self) -> f64 {
        self.grid_size + GRID_GAP
    }

    /// Pixel size of the whole canvas at its current height.
    pub fn pixel_size(&self) -> Size {
        let unit = self.cell_unit();
        Size::new(
            f64::from(GRID_COLUMNS) * unit - GRID_GAP,
            f64::from(self.height) * unit - GRID_GAP,
        )
    }
}

/// Convert a canvas-space pixel position to the unit cell nearest to it.
///
/// The column is clamped to the grid, the row to `0..=u32::MAX`.
pub fn pixel_to_grid(pixel: Point, settings: &CanvasSettings) -> GridPosition {
    let unit = settings.cell_unit();
    let col = (pixel.x / unit).round().clamp(0.0, f64::from(GRID_COLUMNS - 1));
    let row = (pixel.y / unit).round().max(0.0);
    GridPosition::cell(col as u32, row as u32)
}

/// Convert a grid cell to the pixel position of its top-left corner.
pub fn grid_to_pixel(grid: &GridPosition, settings: &CanvasSettings) -> Point {
    let unit = settings.cell_unit();
    Point::new(f64::from(grid.col) * unit, f64::from(grid.row) * unit)
}

/// Convert grid spans to a pixel size.
///
/// One gap is subtracted so neighbouring tiles keep a visible seam.
pub fn grid_size_to_pixel(grid: &GridPosition, settings: &CanvasSettings) -> Size {
    let unit = settings.cell_unit();
    Size::new(
        f64::from(grid.col_span) * unit - GRID_GAP,
        f64::from(grid.row_span) * unit - GRID_GAP,
    )
}

/// Pixel rectangle occupied by a grid footprint.
pub fn grid_to_rect(grid: &GridPosition, settings: &CanvasSettings) -> Rect {
    Rect::from_origin_size(
        grid_to_pixel(grid, settings),
        grid_size_to_pixel(grid, settings),
    )
}

/// Snap a pixel position to the nearest grid cell origin if snapping is enabled.
pub fn snap_to_grid(pixel: Point, settings: &CanvasSettings) -> Point {
    if !settings.snap_to_grid {
        return pixel;
    }
    grid_to_pixel(&pixel_to_grid(pixel, settings), settings)
}
