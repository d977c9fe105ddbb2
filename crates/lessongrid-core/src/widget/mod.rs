//! Widget system for tile selection and in-place editing.
//!
//! Tiles remain pure data. The widget manager layers UI state on top:
//! - which tile is selected (and therefore shows resize handles)
//! - whether that tile is in text or image editing mode

mod manager;
mod state;

pub use manager::WidgetManager;
pub use state::{EditingKind, WidgetState};
