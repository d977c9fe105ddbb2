//! Lesson document: pages of grid-placed tiles and the tile store seam.

use crate::grid::{CanvasSettings, GridPosition, grid_size_to_pixel, grid_to_pixel};
use crate::placement::{calculate_canvas_height, find_available_position, is_valid_position};
use crate::tile::{Tile, TileId, TileKind, TileUpdate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lesson document errors.
#[derive(Debug, Error)]
pub enum LessonError {
    #[error("Tile not found: {0}")]
    TileNotFound(TileId),
    #[error("Page not found: {0}")]
    PageNotFound(usize),
    #[error("A lesson must keep at least one page")]
    LastPage,
    #[error("Invalid placement: {0:?}")]
    InvalidPlacement(GridPosition),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for lesson operations.
pub type LessonResult<T> = Result<T, LessonError>;

/// Read model and write channel the interaction engine works against.
///
/// The engine never creates, deletes or reorders tiles; it only reads the
/// ordered tile list and sends [`TileUpdate`]s.
pub trait TileStore {
    /// Tiles on the active page, in order.
    fn tiles(&self) -> &[Tile];

    /// Canvas settings of the active page.
    fn settings(&self) -> &CanvasSettings;

    /// Apply a partial update to a tile. Unknown ids are ignored.
    fn update_tile(&mut self, id: TileId, update: TileUpdate);

    /// Look up a tile by id.
    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles().iter().find(|tile| tile.id == id)
    }
}

/// A single lesson page with its own canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub canvas: CanvasSettings,
    tiles: Vec<Tile>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new("Untitled page")
    }
}

impl Page {
    /// Create an empty page with default canvas settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_settings(title, CanvasSettings::default())
    }

    /// Create an empty page with the given canvas settings.
    pub fn with_settings(title: impl Into<String>, canvas: CanvasSettings) -> Self {
        let mut page = Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            canvas,
            tiles: Vec::new(),
        };
        page.recompute_height();
        page
    }

    /// Add a tile of `kind` at its default footprint, or the first free slot.
    pub fn add_tile(&mut self, kind: TileKind) -> TileId {
        self.add_tile_at(kind, kind.default_footprint())
    }

    /// Add a tile of `kind`, placing it at `desired` or the first free slot.
    pub fn add_tile_at(&mut self, kind: TileKind, desired: GridPosition) -> TileId {
        self.insert_tile(Tile::new(kind, desired, &self.canvas))
    }

    /// Insert a prepared tile, moving it to the first free slot if needed.
    pub fn insert_tile(&mut self, mut tile: Tile) -> TileId {
        tile.grid_position = find_available_position(&tile.grid_position, &self.canvas, &self.tiles);
        tile.sync_geometry(&self.canvas);
        let id = tile.id;
        log::debug!("Adding {:?} tile {} at {:?}", tile.kind, id, tile.grid_position);
        self.tiles.push(tile);
        self.recompute_height();
        id
    }

    /// Remove a tile from the page.
    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        let index = self.tiles.iter().position(|tile| tile.id == id)?;
        let tile = self.tiles.remove(index);
        self.recompute_height();
        Some(tile)
    }

    /// Move or resize a tile to `candidate` if the placement is legal.
    pub fn place_tile(&mut self, id: TileId, candidate: GridPosition) -> LessonResult<()> {
        if self.tile(id).is_none() {
            return Err(LessonError::TileNotFound(id));
        }
        if !is_valid_position(&candidate, &self.canvas, &self.tiles, Some(id)) {
            return Err(LessonError::InvalidPlacement(candidate));
        }
        self.update_tile(
            id,
            TileUpdate::Geometry {
                position: grid_to_pixel(&candidate, &self.canvas),
                size: grid_size_to_pixel(&candidate, &self.canvas),
                grid_position: candidate,
            },
        );
        Ok(())
    }

    /// Mutable access to a tile for non-geometry edits.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id == id)
    }

    /// Number of tiles on the page.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the page has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Recompute the canvas height from the tile set.
    pub fn recompute_height(&mut self) {
        self.canvas.height = calculate_canvas_height(&self.tiles);
    }

    /// Re-derive geometry, pixel caches and height, e.g. after loading.
    ///
    /// Tiles are re-placed in order against the tiles already accepted, so
    /// out-of-bounds, zero-span or overlapping footprints move to the first
    /// free slot.
    pub fn resync(&mut self) {
        let tiles = std::mem::take(&mut self.tiles);
        for mut tile in tiles {
            let placed = find_available_position(&tile.grid_position, &self.canvas, &self.tiles);
            if placed != tile.grid_position {
                log::warn!(
                    "Tile {} at invalid {:?}, moved to {:?}",
                    tile.id,
                    tile.grid_position,
                    placed
                );
                tile.grid_position = placed;
            }
            tile.sync_geometry(&self.canvas);
            self.tiles.push(tile);
        }
        self.recompute_height();
    }
}

impl TileStore for Page {
    fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn settings(&self) -> &CanvasSettings {
        &self.canvas
    }

    fn update_tile(&mut self, id: TileId, update: TileUpdate) {
        let Some(tile) = self.tile_mut(id) else {
            log::debug!("Ignoring update for unknown tile {}", id);
            return;
        };
        tile.apply(update);
        if matches!(update, TileUpdate::Geometry { .. }) {
            self.recompute_height();
        }
    }
}

/// A multi-page lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pages: Vec<Page>,
    current_page: usize,
}

impl Default for Lesson {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Lesson {
    /// Create a lesson with a single empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            pages: vec![Page::new("Page 1")],
            current_page: 0,
        }
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Index of the page being edited.
    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    /// The page being edited.
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page]
    }

    /// Mutable access to the page being edited.
    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page]
    }

    /// Page at `index`.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Append a page and return its index.
    pub fn add_page(&mut self, title: impl Into<String>) -> usize {
        self.pages.push(Page::new(title));
        self.pages.len() - 1
    }

    /// Remove a page. The last remaining page cannot be removed.
    pub fn remove_page(&mut self, index: usize) -> LessonResult<Page> {
        if index >= self.pages.len() {
            return Err(LessonError::PageNotFound(index));
        }
        if self.pages.len() == 1 {
            return Err(LessonError::LastPage);
        }
        let page = self.pages.remove(index);
        if self.current_page >= self.pages.len() || self.current_page > index {
            self.current_page = self.current_page.saturating_sub(1);
        }
        self.current_page_mut().recompute_height();
        Ok(page)
    }

    /// Switch the page being edited, recomputing its canvas height.
    pub fn set_current_page(&mut self, index: usize) -> LessonResult<()> {
        if index >= self.pages.len() {
            return Err(LessonError::PageNotFound(index));
        }
        self.current_page = index;
        self.current_page_mut().recompute_height();
        Ok(())
    }

    /// Serialize the lesson to JSON.
    pub fn to_json(&self) -> LessonResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a lesson from JSON, re-deriving pixel caches and heights.
    pub fn from_json(json: &str) -> LessonResult<Self> {
        let mut lesson: Lesson = serde_json::from_str(json)?;
        if lesson.pages.is_empty() {
            lesson.pages.push(Page::new("Page 1"));
        }
        lesson.current_page = lesson.current_page.min(lesson.pages.len() - 1);
        for page in &mut lesson.pages {
            page.resync();
        }
        Ok(lesson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::with_settings("Test", CanvasSettings::with_grid_size(120.0))
    }

    #[test]
    fn test_add_tile_uses_first_fit() {
        let mut page = page();
        let a = page.add_tile_at(TileKind::Text, GridPosition::new(0, 0, 6, 1));
        let b = page.add_tile_at(TileKind::Text, GridPosition::new(0, 0, 2, 1));
        assert_eq!(page.tile(a).unwrap().grid_position, GridPosition::new(0, 0, 6, 1));
        let tile_b = page.tile(b).unwrap();
        assert_eq!(tile_b.grid_position, GridPosition::new(0, 1, 2, 1));
        assert_eq!(tile_b.position, kurbo::Point::new(0.0, 128.0));
    }

    #[test]
    fn test_height_tracks_tiles() {
        let mut page = page();
        assert_eq!(page.canvas.height, 6);
        let id = page.add_tile_at(TileKind::Image, GridPosition::new(0, 3, 2, 2));
        assert_eq!(page.canvas.height, 7);
        page.place_tile(id, GridPosition::new(0, 8, 2, 2)).unwrap();
        assert_eq!(page.canvas.height, 12);
        page.remove_tile(id);
        assert_eq!(page.canvas.height, 6);
    }

    #[test]
    fn test_place_tile_rejects_overlap() {
        let mut page = page();
        let a = page.add_tile_at(TileKind::Text, GridPosition::new(0, 0, 2, 1));
        page.add_tile_at(TileKind::Text, GridPosition::new(2, 0, 2, 1));
        let result = page.place_tile(a, GridPosition::new(1, 0, 2, 1));
        assert!(matches!(result, Err(LessonError::InvalidPlacement(_))));
        assert_eq!(page.tile(a).unwrap().grid_position, GridPosition::new(0, 0, 2, 1));
    }

    #[test]
    fn test_place_unknown_tile() {
        let mut page = page();
        let result = page.place_tile(TileId::new(), GridPosition::default());
        assert!(matches!(result, Err(LessonError::TileNotFound(_))));
    }

    #[test]
    fn test_pages() {
        let mut lesson = Lesson::new("Fractions");
        assert!(matches!(lesson.remove_page(0), Err(LessonError::LastPage)));
        let second = lesson.add_page("Practice");
        lesson.set_current_page(second).unwrap();
        assert_eq!(lesson.current_page().title, "Practice");
        assert!(matches!(lesson.set_current_page(5), Err(LessonError::PageNotFound(5))));
        lesson.remove_page(second).unwrap();
        assert_eq!(lesson.current_page_index(), 0);
    }

    #[test]
    fn test_page_switch_recomputes_height() {
        let mut lesson = Lesson::new("Fractions");
        let second = lesson.add_page("Practice");
        lesson.set_current_page(second).unwrap();
        lesson
            .current_page_mut()
            .add_tile_at(TileKind::Text, GridPosition::new(0, 6, 2, 2));
        assert_eq!(lesson.current_page().canvas.height, 10);

        lesson.current_page_mut().canvas.height = 40;
        lesson.set_current_page(0).unwrap();
        lesson.set_current_page(second).unwrap();
        assert_eq!(lesson.current_page().canvas.height, 10);

        // Leave a stale height on the first page, then drop the second.
        lesson.set_current_page(0).unwrap();
        lesson.current_page_mut().canvas.height = 40;
        lesson.set_current_page(second).unwrap();
        assert_eq!(lesson.page(0).unwrap().canvas.height, 40);
        lesson.remove_page(second).unwrap();
        assert_eq!(lesson.current_page_index(), 0);
        assert_eq!(lesson.current_page().canvas.height, 6);
    }

    #[test]
    fn test_json_roundtrip_resyncs() {
        let mut lesson = Lesson::new("Shapes");
        let id = lesson.current_page_mut().add_tile(TileKind::Quiz);
        let json = lesson.to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        // Corrupt the pixel cache; loading must restore it.
        value["pages"][0]["tiles"][0]["position"]["x"] = serde_json::json!(999.0);
        let loaded = Lesson::from_json(&value.to_string()).unwrap();
        let tile = loaded.current_page().tile(id).unwrap();
        assert_eq!(tile.position, kurbo::Point::ZERO);
        assert_eq!(tile.grid_position, TileKind::Quiz.default_footprint());
    }

    #[test]
    fn test_load_repairs_invalid_geometry() {
        let mut lesson = Lesson::new("Broken");
        let page = lesson.current_page_mut();
        let a = page.add_tile_at(TileKind::Text, GridPosition::new(0, 0, 2, 1));
        let b = page.add_tile_at(TileKind::Text, GridPosition::new(2, 0, 2, 1));
        let c = page.add_tile_at(TileKind::Text, GridPosition::new(4, 0, 1, 1));
        let mut value = serde_json::to_value(&lesson).unwrap();
        value["pages"][0]["tiles"][0]["gridPosition"]["colSpan"] = serde_json::json!(9);
        value["pages"][0]["tiles"][1]["gridPosition"]["col"] = serde_json::json!(1);
        value["pages"][0]["tiles"][2]["gridPosition"]["rowSpan"] = serde_json::json!(0);

        let loaded = Lesson::from_json(&value.to_string()).unwrap();
        let page = loaded.current_page();
        assert_eq!(page.tile(a).unwrap().grid_position, GridPosition::new(0, 0, 6, 1));
        assert_eq!(page.tile(b).unwrap().grid_position, GridPosition::new(0, 1, 2, 1));
        assert_eq!(page.tile(c).unwrap().grid_position, GridPosition::new(2, 1, 1, 1));
        let tiles = page.tiles();
        for (i, tile) in tiles.iter().enumerate() {
            assert!(is_valid_position(&tile.grid_position, &page.canvas, tiles, Some(tile.id)));
            assert_eq!(tile.position, grid_to_pixel(&tile.grid_position, &page.canvas));
            for other in &tiles[i + 1..] {
                assert!(!tile.grid_position.overlaps(&other.grid_position));
            }
        }
        assert_eq!(page.canvas.height, 6);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Lesson::from_json("{"), Err(LessonError::Serialization(_))));
    }
}
