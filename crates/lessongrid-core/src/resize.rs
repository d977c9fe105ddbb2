//! Resize handles and resize geometry.

use crate::grid::{GRID_COLUMNS, GridPosition};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Handle hit tolerance in pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// One of the eight resize affordances around a selected tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    /// All handles, corners first. Hit testing follows this order.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
    ];

    /// Short compass name (`"n"`, `"se"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Nw => "nw",
            ResizeHandle::Se => "se",
            ResizeHandle::Sw => "sw",
        }
    }

    /// Moves the top edge.
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    /// Moves the bottom edge.
    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    /// Moves the right edge.
    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    /// Moves the left edge.
    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Pixel anchor of this handle on a tile rectangle.
    pub fn anchor(self, rect: Rect) -> Point {
        let x = if self.moves_west() {
            rect.x0
        } else if self.moves_east() {
            rect.x1
        } else {
            rect.center().x
        };
        let y = if self.moves_north() {
            rect.y0
        } else if self.moves_south() {
            rect.y1
        } else {
            rect.center().y
        };
        Point::new(x, y)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a handle name is not one of the eight compass names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resize handle: {0:?}")]
pub struct ParseHandleError(pub String);

impl FromStr for ResizeHandle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|handle| handle.name() == s)
            .ok_or_else(|| ParseHandleError(s.to_string()))
    }
}

/// All handle anchors for a tile rectangle.
pub fn handle_positions(rect: Rect) -> Vec<(ResizeHandle, Point)> {
    ResizeHandle::ALL
        .into_iter()
        .map(|handle| (handle, handle.anchor(rect)))
        .collect()
}

/// Find which handle (if any) lies within `tolerance` of `point`.
pub fn hit_test_handle(rect: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let anchor = handle.anchor(rect);
        let dx = point.x - anchor.x;
        let dy = point.y - anchor.y;
        dx * dx + dy * dy <= tolerance * tolerance
    })
}

/// Compute the grid rectangle produced by dragging `handle` by `delta` pixels.
///
/// The edge opposite each moved edge stays fixed. Spans never drop below 1,
/// the right edge never passes [`GRID_COLUMNS`], and the left/top edges never
/// pass zero. Grid deltas are clamped to the `u32` range, so huge pointer
/// deltas saturate instead of overflowing. The result is a candidate and
/// still needs placement validation.
pub fn compute_resize(
    handle: ResizeHandle,
    start: &GridPosition,
    delta: Vec2,
    cell_unit: f64,
) -> GridPosition {
    let limit = i64::from(u32::MAX);
    let delta_cols = ((delta.x / cell_unit).round() as i64).clamp(-limit, limit);
    let delta_rows = ((delta.y / cell_unit).round() as i64).clamp(-limit, limit);

    let mut col = i64::from(start.col);
    let mut row = i64::from(start.row);
    let mut col_span = i64::from(start.col_span);
    let mut row_span = i64::from(start.row_span);
    let columns = i64::from(GRID_COLUMNS);

    if handle.moves_east() {
        col_span = (col_span + delta_cols).min(columns - col).max(1);
    }
    if handle.moves_west() {
        let right = col + col_span;
        col = (col + delta_cols).clamp(0, (right - 1).max(0));
        col_span = (right - col).max(1);
    }
    if handle.moves_south() {
        row_span = (row_span + delta_rows).max(1);
    }
    if handle.moves_north() {
        let bottom = row + row_span;
        row = (row + delta_rows).clamp(0, (bottom - 1).max(0));
        row_span = (bottom - row).max(1);
    }

    GridPosition::new(
        to_u32(col),
        to_u32(row),
        to_u32(col_span),
        to_u32(row_span),
    )
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
