//! Tile definitions as seen by the grid engine.
//!
//! The engine only reads and writes tile geometry and, for image tiles, the
//! image frame. All other per-type content is carried as opaque JSON.

use crate::grid::{CanvasSettings, GridPosition, grid_size_to_pixel, grid_to_pixel};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(Uuid);

impl TileId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying uuid.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Interactive tile types available in the lesson palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    Text,
    Image,
    Quiz,
    Pairing,
    Sequencing,
    OpenAnswer,
    Programming,
    Blanks,
}

impl TileKind {
    /// Default footprint used when a tile is dropped from the palette.
    pub fn default_footprint(self) -> GridPosition {
        match self {
            TileKind::Text => GridPosition::new(0, 0, 2, 1),
            TileKind::Image => GridPosition::new(0, 0, 2, 2),
            TileKind::Quiz | TileKind::Pairing | TileKind::Sequencing => {
                GridPosition::new(0, 0, 3, 2)
            }
            TileKind::OpenAnswer | TileKind::Blanks => GridPosition::new(0, 0, 3, 1),
            TileKind::Programming => GridPosition::new(0, 0, 4, 3),
        }
    }
}

/// Pan/zoom state of an image inside its tile, in content space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageFrame {
    /// Offset of the image's top-left corner relative to the tile. Never positive.
    pub position: Point,
    /// Zoom factor applied to the image.
    pub scale: f64,
}

impl Default for ImageFrame {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
        }
    }
}

/// Tile content. Only image frames are interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileContent {
    Image(ImageFrame),
    Opaque(serde_json::Value),
}

impl TileContent {
    fn for_kind(kind: TileKind) -> Self {
        match kind {
            TileKind::Image => TileContent::Image(ImageFrame::default()),
            _ => TileContent::Opaque(serde_json::Value::Null),
        }
    }
}

/// A partial update sent through the tile store write channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileUpdate {
    /// New geometry after a validated move or resize.
    Geometry {
        position: Point,
        size: Size,
        grid_position: GridPosition,
    },
    /// New image offset after a pan step.
    ImagePosition(Point),
    /// New image zoom factor.
    ImageScale(f64),
}

/// A tile placed on a lesson page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub grid_position: GridPosition,
    /// Pixel position, cached from `grid_position`.
    pub position: Point,
    /// Pixel size, cached from `grid_position`.
    pub size: Size,
    pub content: TileContent,
}

impl Tile {
    /// Create a tile at the given footprint with synced pixel caches.
    pub fn new(kind: TileKind, grid_position: GridPosition, settings: &CanvasSettings) -> Self {
        let mut tile = Self {
            id: TileId::new(),
            kind,
            grid_position,
            position: Point::ZERO,
            size: Size::ZERO,
            content: TileContent::for_kind(kind),
        };
        tile.sync_geometry(settings);
        tile
    }

    /// Recompute `position` and `size` from `grid_position`.
    pub fn sync_geometry(&mut self, settings: &CanvasSettings) {
        self.position = grid_to_pixel(&self.grid_position, settings);
        self.size = grid_size_to_pixel(&self.grid_position, settings);
    }

    /// Pixel rectangle currently occupied by the tile.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a canvas-space point lies on the tile.
    pub fn hit_test(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// Image frame, if this is an image tile.
    pub fn image(&self) -> Option<&ImageFrame> {
        match &self.content {
            TileContent::Image(frame) => Some(frame),
            TileContent::Opaque(_) => None,
        }
    }

    /// Apply a write-channel update.
    ///
    /// Image updates on a non-image tile are ignored.
    pub fn apply(&mut self, update: TileUpdate) {
        match update {
            TileUpdate::Geometry {
                position,
                size,
                grid_position,
            } => {
                self.position = position;
                self.size = size;
                self.grid_position = grid_position;
            }
            TileUpdate::ImagePosition(position) => {
                if let TileContent::Image(frame) = &mut self.content {
                    frame.position = position;
                }
            }
            TileUpdate::ImageScale(scale) => {
                if let TileContent::Image(frame) = &mut self.content {
                    frame.scale = scale;
                }
            }
        }
    }
}
