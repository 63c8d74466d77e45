use crate::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Smallest zoom factor the viewport accepts.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest zoom factor the viewport accepts.
pub const MAX_ZOOM: f64 = 3.0;

/// Logical canvas dimensions in pixels, shared by every scene of a template.
///
/// Elements are authored in this coordinate space; on-screen zoom never
/// changes element geometry, only the viewport mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a validated canvas size with both dimensions > 0.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        // 9:16 portrait, the common short-video preset.
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// View mapping between logical canvas space and screen space.
///
/// `screen = logical * zoom + pan`. Pure value type; changing the zoom is a
/// state transition that never touches element geometry.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vec2,
}

impl Viewport {
    /// Identity viewport (zoom 1, no pan).
    pub fn identity() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    /// Return a copy with `zoom` clamped into `[MIN_ZOOM, MAX_ZOOM]`.
    ///
    /// Non-finite input clamps to 1.0.
    pub fn with_zoom(self, zoom: f64) -> Self {
        let zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        Self { zoom, ..self }
    }

    /// Return a copy panned by `delta` screen pixels.
    pub fn panned(self, delta: Vec2) -> Self {
        Self {
            pan: self.pan + delta,
            ..self
        }
    }

    /// Map a logical-canvas point to a screen point.
    pub fn to_screen(self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    /// Map a screen point back to logical-canvas space.
    pub fn to_canvas(self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// Clamp an element's top-left corner so its `width x height` box stays
/// inside the canvas.
///
/// When the element is larger than the canvas the clamp resolves to 0 (the
/// `max(0, ..)` branch wins).
pub fn clamp_position(x: f64, y: f64, width: f64, height: f64, canvas: CanvasSize) -> (f64, f64) {
    let cx = x.min(canvas.width_f64() - width).max(0.0);
    let cy = y.min(canvas.height_f64() - height).max(0.0);
    (cx, cy)
}

/// Normalize a rotation in degrees into `[0, 360)` for display.
pub fn normalize_rotation_deg(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    deg.rem_euclid(360.0)
}
