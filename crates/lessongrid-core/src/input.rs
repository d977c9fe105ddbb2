//! Pointer and keyboard input delivered to the interaction controller.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Identifier of a physical pointer (mouse, pen or touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// Pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { pointer: PointerId, position: Point },
    Move { pointer: PointerId, position: Point },
    Up { pointer: PointerId, position: Point },
    /// The platform cancelled the pointer stream.
    Cancel { pointer: PointerId },
    /// Capture of the pointer was lost (e.g. it left the document).
    Lost { pointer: PointerId },
    /// Wheel scroll over the canvas.
    Wheel { position: Point, delta: Vec2 },
}

impl PointerEvent {
    /// Pointer this event belongs to. Wheel events have none.
    pub fn pointer(&self) -> Option<PointerId> {
        match *self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. }
            | PointerEvent::Cancel { pointer }
            | PointerEvent::Lost { pointer } => Some(pointer),
            PointerEvent::Wheel { .. } => None,
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name to a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}
