//! In-place image panning and zooming inside an image tile.

use kurbo::{Point, Vec2};

/// Smallest zoom factor; the image always covers its tile.
pub const MIN_IMAGE_SCALE: f64 = 1.0;
/// Largest zoom factor.
pub const MAX_IMAGE_SCALE: f64 = 5.0;
/// Zoom multiplier applied per wheel notch.
pub const IMAGE_ZOOM_STEP: f64 = 1.1;

/// Clamp an image offset so the image never reveals empty space at its top-left.
pub fn clamp_image_offset(offset: Point) -> Point {
    Point::new(offset.x.min(0.0), offset.y.min(0.0))
}

/// Image offset after panning by `delta` from `origin_at_start`.
pub fn pan_image(origin_at_start: Point, delta: Vec2) -> Point {
    clamp_image_offset(origin_at_start + delta)
}

/// New zoom factor after a wheel step.
///
/// Negative `wheel_delta` (wheel up) zooms in, positive zooms out.
pub fn zoom_image(scale: f64, wheel_delta: f64) -> f64 {
    let next = if wheel_delta < 0.0 {
        scale * IMAGE_ZOOM_STEP
    } else if wheel_delta > 0.0 {
        scale / IMAGE_ZOOM_STEP
    } else {
        scale
    };
    next.clamp(MIN_IMAGE_SCALE, MAX_IMAGE_SCALE)
}
