//! Parameter structs for Canvas 2D drawing operations.
//!
//! Grouping coordinates into named fields keeps call sites readable where the
//! HTML canvas API would take long positional argument lists.

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Radii of a single rounded corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    pub x: f32,
    pub y: f32,
}

impl CornerRadius {
    /// Circular corner with the same radius on both axes.
    pub fn circular(radius: f32) -> Self {
        Self {
            x: radius,
            y: radius,
        }
    }
}

/// Rounded rectangle with per-corner radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRectParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub radii: [CornerRadius; 4],
}

impl RoundRectParams {
    /// Rounded rectangle with the same circular radius on every corner.
    pub fn uniform(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            radii: [CornerRadius::circular(radius); 4],
        }
    }
}

/// Parameters for a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// X coordinate of the arc center.
    pub x: f32,
    /// Y coordinate of the arc center.
    pub y: f32,
    /// Radius of the arc.
    pub radius: f32,
    /// Starting angle in radians.
    pub start_angle: f32,
    /// Ending angle in radians.
    pub end_angle: f32,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

impl ArcParams {
    /// Full circle centered at `(x, y)`.
    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            start_angle: 0.0,
            end_angle: std::f32::consts::TAU,
            anticlockwise: false,
        }
    }
}

/// Borrowed premultiplied RGBA pixels, as accepted by `draw_image_scaled`.
#[derive(Debug, Clone, Copy)]
pub struct CanvasPixmapRef<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> From<&'a tiny_skia::Pixmap> for CanvasPixmapRef<'a> {
    fn from(pixmap: &'a tiny_skia::Pixmap) -> Self {
        Self {
            data: pixmap.data(),
            width: pixmap.width(),
            height: pixmap.height(),
        }
    }
}
