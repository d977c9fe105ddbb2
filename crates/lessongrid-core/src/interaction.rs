//! Pointer interaction state machine: move-drag, resize and image panning.
//!
//! At most one interaction is active per canvas. Every pointer move computes
//! a candidate geometry; drag and resize candidates are committed through the
//! [`TileStore`] only after passing placement validation, otherwise the move
//! is dropped and the tile stays at its last valid geometry.

use crate::grid::{GridPosition, grid_size_to_pixel, grid_to_pixel, pixel_to_grid, snap_to_grid};
use crate::image::{pan_image, zoom_image};
use crate::input::{Key, PointerEvent, PointerId};
use crate::lesson::TileStore;
use crate::placement::is_valid_position;
use crate::resize::{HANDLE_HIT_TOLERANCE, ResizeHandle, compute_resize, hit_test_handle};
use crate::tile::{TileId, TileUpdate};
use crate::widget::{EditingKind, WidgetManager, WidgetState};
use kurbo::{Point, Vec2};

/// Receives pointer subscription changes.
///
/// The controller subscribes when an interaction starts and unsubscribes
/// when it returns to idle, so a host only listens for document-wide
/// move/up events while a gesture is in progress.
pub trait PointerCapture {
    /// Start routing moves/ups for `pointer` to the controller.
    fn subscribe(&mut self, pointer: PointerId);
    /// Stop routing events for `pointer`.
    fn unsubscribe(&mut self, pointer: PointerId);
}

/// Capture sink for hosts that always route every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn subscribe(&mut self, _pointer: PointerId) {}
    fn unsubscribe(&mut self, _pointer: PointerId) {}
}

/// The active pointer interaction. Exactly one variant at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Moving a tile; the offset keeps the grab point under the cursor.
    Drag {
        tile_id: TileId,
        pointer_offset: Vec2,
    },
    /// Resizing a tile from one of its handles.
    Resize {
        tile_id: TileId,
        handle: ResizeHandle,
        pointer_start: Point,
        start_grid_position: GridPosition,
    },
    /// Panning the image inside an image tile.
    ImagePan {
        tile_id: TileId,
        pointer_start: Point,
        image_origin_at_start: Point,
    },
}

impl InteractionState {
    /// Check if no interaction is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Tile targeted by the active interaction.
    pub fn tile_id(&self) -> Option<TileId> {
        match *self {
            InteractionState::Idle => None,
            InteractionState::Drag { tile_id, .. }
            | InteractionState::Resize { tile_id, .. }
            | InteractionState::ImagePan { tile_id, .. } => Some(tile_id),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Drag { .. } => "drag",
            InteractionState::Resize { .. } => "resize",
            InteractionState::ImagePan { .. } => "imagePan",
        }
    }
}

/// Message sent by the tile renderer when a resize handle is pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStart {
    pub tile_id: TileId,
    pub handle: ResizeHandle,
    pub pointer: PointerId,
    /// Pointer position in client coordinates.
    pub position: Point,
}

/// Commands the controller hands back to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// The host should delete this tile.
    DeleteTile(TileId),
}

/// Drives the interaction state machine from pointer and keyboard input.
#[derive(Debug, Default)]
pub struct InteractionController<C: PointerCapture = NoCapture> {
    state: InteractionState,
    widgets: WidgetManager,
    /// Client-space position of the canvas top-left corner.
    canvas_origin: Point,
    active_pointer: Option<PointerId>,
    capture: C,
}

impl InteractionController<NoCapture> {
    /// Create an idle controller with no pointer capture hook.
    pub fn new() -> Self {
        Self::with_capture(NoCapture)
    }
}

impl<C: PointerCapture> InteractionController<C> {
    /// Create an idle controller reporting subscriptions to `capture`.
    pub fn with_capture(capture: C) -> Self {
        Self {
            state: InteractionState::Idle,
            widgets: WidgetManager::new(),
            canvas_origin: Point::ZERO,
            active_pointer: None,
            capture,
        }
    }

    /// Current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Selection and editing state.
    pub fn widgets(&self) -> &WidgetManager {
        &self.widgets
    }

    /// Mutable selection and editing state, e.g. to enter text editing.
    pub fn widgets_mut(&mut self) -> &mut WidgetManager {
        &mut self.widgets
    }

    /// The capture hook.
    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// Set where the canvas sits in client coordinates.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Pointer driving the active interaction.
    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active_pointer
    }

    fn to_canvas(&self, client: Point) -> Point {
        client - self.canvas_origin.to_vec2()
    }

    /// Process a pointer event.
    pub fn handle_pointer(&mut self, store: &mut impl TileStore, event: PointerEvent) {
        match event {
            PointerEvent::Down { pointer, position } => self.pointer_down(store, pointer, position),
            PointerEvent::Move { pointer, position } => self.pointer_move(store, pointer, position),
            PointerEvent::Up { pointer, .. }
            | PointerEvent::Cancel { pointer }
            | PointerEvent::Lost { pointer } => {
                if self.active_pointer == Some(pointer) {
                    self.finish(store);
                }
            }
            PointerEvent::Wheel { position, delta } => self.wheel(store, position, delta),
        }
    }

    /// Start a resize on request of the tile renderer.
    pub fn begin_resize(&mut self, store: &impl TileStore, request: ResizeStart) {
        if !self.state.is_idle() {
            log::debug!("Ignoring resize start while {} is active", self.state.name());
            return;
        }
        let Some(tile) = store.tile(request.tile_id) else {
            log::debug!("Ignoring resize start for unknown tile {}", request.tile_id);
            return;
        };
        if self.widgets.is_editing_tile(tile.id) {
            return;
        }
        let start_grid_position = tile.grid_position;
        self.widgets.select(tile.id);
        self.enter(
            InteractionState::Resize {
                tile_id: request.tile_id,
                handle: request.handle,
                pointer_start: self.to_canvas(request.position),
                start_grid_position,
            },
            request.pointer,
        );
    }

    /// Process a key press. Returns a command for the host when one applies.
    pub fn handle_key(&mut self, store: &mut impl TileStore, key: &Key) -> Option<KeyCommand> {
        match key {
            Key::Escape => {
                self.cancel(store);
                None
            }
            Key::Delete | Key::Backspace => {
                let id = self.widgets.selected()?;
                // The text editor owns Delete while editing.
                if self.widgets.state(id) == WidgetState::Editing(EditingKind::Text) {
                    return None;
                }
                if self.state.tile_id() == Some(id) {
                    self.finish(store);
                }
                self.widgets.remove(id);
                Some(KeyCommand::DeleteTile(id))
            }
            Key::Other(_) => None,
        }
    }

    /// Force the controller back to idle, keeping the last committed geometry.
    pub fn cancel(&mut self, store: &mut impl TileStore) {
        if !self.state.is_idle() {
            self.finish(store);
        }
    }

    fn pointer_down(&mut self, store: &mut impl TileStore, pointer: PointerId, client: Point) {
        if !self.state.is_idle() {
            log::debug!("Ignoring pointer down while {} is active", self.state.name());
            return;
        }
        let point = self.to_canvas(client);

        if let Some(id) = self.widgets.selected() {
            if self.widgets.state(id).shows_handles() {
                if let Some(tile) = store.tile(id) {
                    if let Some(handle) = hit_test_handle(tile.rect(), point, HANDLE_HIT_TOLERANCE) {
                        let start_grid_position = tile.grid_position;
                        self.enter(
                            InteractionState::Resize {
                                tile_id: id,
                                handle,
                                pointer_start: point,
                                start_grid_position,
                            },
                            pointer,
                        );
                        return;
                    }
                }
            }
        }

        let Some(tile) = store.tiles().iter().rev().find(|tile| tile.hit_test(point)) else {
            self.widgets.clear_selection();
            return;
        };

        let next = match self.widgets.state(tile.id) {
            WidgetState::Editing(EditingKind::Image) => match tile.image() {
                Some(frame) => InteractionState::ImagePan {
                    tile_id: tile.id,
                    pointer_start: point,
                    image_origin_at_start: frame.position,
                },
                None => return,
            },
            WidgetState::Editing(EditingKind::Text) => return,
            WidgetState::Normal | WidgetState::Selected => InteractionState::Drag {
                tile_id: tile.id,
                pointer_offset: point - tile.position,
            },
        };
        self.widgets.select(tile.id);
        self.enter(next, pointer);
    }

    fn pointer_move(&mut self, store: &mut impl TileStore, pointer: PointerId, client: Point) {
        if self.active_pointer != Some(pointer) {
            return;
        }
        let point = self.to_canvas(client);
        let settings = *store.settings();

        match self.state {
            InteractionState::Idle => {}
            InteractionState::Drag {
                tile_id,
                pointer_offset,
            } => {
                let Some(tile) = store.tile(tile_id) else {
                    self.finish(store);
                    return;
                };
                let pixel = point - pointer_offset;
                let cell = pixel_to_grid(pixel, &settings);
                let candidate = tile.grid_position.at(cell.col, cell.row);
                if !is_valid_position(&candidate, &settings, store.tiles(), Some(tile_id)) {
                    log::trace!("Drag of {} to {:?} rejected", tile_id, candidate);
                    return;
                }
                let snapped = snap_to_grid(pixel, &settings);
                let update = TileUpdate::Geometry {
                    position: Point::new(snapped.x.max(0.0), snapped.y.max(0.0)),
                    size: grid_size_to_pixel(&candidate, &settings),
                    grid_position: candidate,
                };
                store.update_tile(tile_id, update);
            }
            InteractionState::Resize {
                tile_id,
                handle,
                pointer_start,
                start_grid_position,
            } => {
                let Some(tile) = store.tile(tile_id) else {
                    self.finish(store);
                    return;
                };
                let candidate = compute_resize(
                    handle,
                    &start_grid_position,
                    point - pointer_start,
                    settings.cell_unit(),
                );
                if candidate == tile.grid_position {
                    return;
                }
                if !is_valid_position(&candidate, &settings, store.tiles(), Some(tile_id)) {
                    log::trace!("Resize of {} to {:?} rejected", tile_id, candidate);
                    return;
                }
                let update = TileUpdate::Geometry {
                    position: grid_to_pixel(&candidate, &settings),
                    size: grid_size_to_pixel(&candidate, &settings),
                    grid_position: candidate,
                };
                store.update_tile(tile_id, update);
            }
            InteractionState::ImagePan {
                tile_id,
                pointer_start,
                image_origin_at_start,
            } => {
                let offset = pan_image(image_origin_at_start, point - pointer_start);
                store.update_tile(tile_id, TileUpdate::ImagePosition(offset));
            }
        }
    }

    fn wheel(&mut self, store: &mut impl TileStore, client: Point, delta: Vec2) {
        let Some((id, EditingKind::Image)) = self.widgets.editing() else {
            return;
        };
        let point = self.to_canvas(client);
        let Some(tile) = store.tile(id) else {
            return;
        };
        if !tile.hit_test(point) {
            return;
        }
        let Some(frame) = tile.image() else {
            return;
        };
        let scale = zoom_image(frame.scale, delta.y);
        if scale != frame.scale {
            store.update_tile(id, TileUpdate::ImageScale(scale));
        }
    }

    fn enter(&mut self, state: InteractionState, pointer: PointerId) {
        log::debug!("Interaction {} -> {}", self.state.name(), state.name());
        self.state = state;
        self.active_pointer = Some(pointer);
        self.capture.subscribe(pointer);
    }

    /// Return to idle. A drag with snapping disabled leaves the tile at a free
    /// pixel position, so its caches are re-aligned to the committed cell.
    fn finish(&mut self, store: &mut impl TileStore) {
        if let InteractionState::Drag { tile_id, .. } = self.state {
            if let Some(tile) = store.tile(tile_id) {
                let settings = *store.settings();
                let aligned = grid_to_pixel(&tile.grid_position, &settings);
                if tile.position != aligned {
                    let update = TileUpdate::Geometry {
                        position: aligned,
                        size: grid_size_to_pixel(&tile.grid_position, &settings),
                        grid_position: tile.grid_position,
                    };
                    store.update_tile(tile_id, update);
                }
            }
        }
        log::debug!("Interaction {} -> idle", self.state.name());
        self.state = InteractionState::Idle;
        if let Some(pointer) = self.active_pointer.take() {
            self.capture.unsubscribe(pointer);
        }
    }
}
