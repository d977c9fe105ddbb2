//! Widget manager for tracking selection and editing of tiles.

use super::state::{EditingKind, WidgetState};
use crate::tile::TileId;

/// Tracks which tile is selected and which (if any) is being edited in place.
///
/// Selection is orthogonal to the pointer interaction state: it survives
/// the end of a drag or resize.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    selected: Option<TileId>,
    editing: Option<EditingKind>,
}

impl WidgetManager {
    /// Create a new widget manager with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of a tile.
    pub fn state(&self, id: TileId) -> WidgetState {
        if self.selected != Some(id) {
            return WidgetState::Normal;
        }
        match self.editing {
            Some(kind) => WidgetState::Editing(kind),
            None => WidgetState::Selected,
        }
    }

    /// The selected tile, if any.
    pub fn selected(&self) -> Option<TileId> {
        self.selected
    }

    /// Check if a tile is selected.
    pub fn is_selected(&self, id: TileId) -> bool {
        self.selected == Some(id)
    }

    /// Select a tile. Selecting a different tile ends any editing.
    pub fn select(&mut self, id: TileId) {
        if self.selected != Some(id) {
            self.editing = None;
        }
        self.selected = Some(id);
    }

    /// Clear the selection and any editing.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.editing = None;
    }

    /// Enter an editing mode for a tile, selecting it.
    pub fn enter_editing(&mut self, id: TileId, kind: EditingKind) {
        self.select(id);
        self.editing = Some(kind);
    }

    /// Leave editing mode, keeping the selection.
    pub fn exit_editing(&mut self) {
        self.editing = None;
    }

    /// The tile being edited and the editing kind.
    pub fn editing(&self) -> Option<(TileId, EditingKind)> {
        self.selected.zip(self.editing)
    }

    /// Check if a specific tile is being edited.
    pub fn is_editing_tile(&self, id: TileId) -> bool {
        self.state(id).is_editing()
    }

    /// Forget a deleted tile.
    pub fn remove(&mut self, id: TileId) {
        if self.selected == Some(id) {
            self.clear_selection();
        }
    }
}
