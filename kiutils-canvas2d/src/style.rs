//! Style types for Canvas 2D operations.

use crate::gradient::CanvasGradient;

/// Paint source for fill and stroke operations.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color.
    Color(tiny_skia::Color),
    /// Linear gradient.
    LinearGradient(CanvasGradient),
}

impl Default for FillStyle {
    fn default() -> Self {
        // Default is opaque black
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text ends at the anchor.
    Right,
    /// Text is centered on the anchor.
    Center,
    /// Same as `Left` for left-to-right text.
    Start,
    /// Same as `Right` for left-to-right text.
    End,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Bottom of the em square.
    Bottom,
}
