//! Widget state definitions.

/// The UI state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Not selected.
    #[default]
    Normal,
    /// Selected: shows resize handles, can be moved/resized.
    Selected,
    /// Selected and in an in-place editing mode.
    Editing(EditingKind),
}

impl WidgetState {
    /// Check if the tile is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }

    /// Check if the tile is in an editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Whether resize handles are offered.
    pub fn shows_handles(&self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// Kind of in-place editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingKind {
    /// Rich-text editing; the editor owns pointer input on the tile.
    Text,
    /// Image framing; pointer drags pan the image instead of the tile.
    Image,
}
