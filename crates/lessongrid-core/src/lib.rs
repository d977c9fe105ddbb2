//! LessonGrid Core Library
//!
//! Grid layout and pointer-interaction engine for the LessonGrid lesson editor:
//! pixel/grid coordinate transforms, non-overlapping tile placement, resize
//! geometry and the interaction state machine that arbitrates drag, resize
//! and image panning gestures.

pub mod grid;
pub mod image;
pub mod input;
pub mod interaction;
pub mod lesson;
pub mod placement;
pub mod resize;
pub mod tile;
pub mod widget;

pub use grid::{
    CanvasSettings, GRID_COLUMNS, GRID_GAP, GridPosition, grid_size_to_pixel, grid_to_pixel,
    pixel_to_grid, snap_to_grid,
};
pub use input::{Key, PointerEvent, PointerId};
pub use interaction::{
    InteractionController, InteractionState, KeyCommand, NoCapture, PointerCapture, ResizeStart,
};
pub use lesson::{Lesson, LessonError, LessonResult, Page, TileStore};
pub use placement::{calculate_canvas_height, find_available_position, is_valid_position};
pub use resize::{ParseHandleError, ResizeHandle, compute_resize};
pub use tile::{ImageFrame, Tile, TileContent, TileId, TileKind, TileUpdate};
pub use widget::{EditingKind, WidgetManager, WidgetState};
