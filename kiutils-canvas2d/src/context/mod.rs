//! Canvas 2D rendering context implementation.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use crate::gradient::CanvasGradient;
use crate::style::FillStyle;
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::Pixmap;

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Canvas 2D rendering context.
///
/// Path coordinates are device pixels; this surface has no transform stack.
pub struct Canvas2dContext {
    /// Width of the canvas in pixels.
    pub(crate) width: u32,
    /// Height of the canvas in pixels.
    pub(crate) height: u32,
    /// Pixel buffer (premultiplied RGBA).
    pub(crate) pixmap: Pixmap,
    /// Font system for text shaping.
    pub(crate) font_system: FontSystem,
    /// Swash cache for glyph outlines.
    pub(crate) swash_cache: SwashCache,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states.
    state_stack: Vec<DrawingState>,
    /// Current path builder.
    pub(crate) path_builder: tiny_skia::PathBuilder,
    /// Whether the current path has a current point.
    pub(crate) has_current_point: bool,
}

impl Canvas2dContext {
    /// Create a new context with the specified dimensions.
    ///
    /// Uses `FontConfig::default()`, which scans system fonts. Prefer
    /// [`Canvas2dContext::with_resolved`] when creating many contexts.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::with_config(width, height, FontConfig::default())
    }

    /// Create a new context with the specified dimensions and font configuration.
    pub fn with_config(width: u32, height: u32, config: FontConfig) -> Canvas2dResult<Self> {
        Self::with_resolved(width, height, &config.resolve())
    }

    /// Create a new context using a pre-resolved font configuration.
    ///
    /// The font database is copied out of the shared [`ResolvedFontConfig`]
    /// without rescanning the filesystem.
    pub fn with_resolved(
        width: u32,
        height: u32,
        resolved: &ResolvedFontConfig,
    ) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;

        let font_db = fontdb::Database::clone(&resolved.fontdb);
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path_builder: tiny_skia::PathBuilder::new(),
            has_current_point: false,
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the previously saved drawing state.
    ///
    /// Restoring with an empty stack is a no-op.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state.fill_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the fill style to a gradient.
    pub fn set_fill_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.fill_style = FillStyle::LinearGradient(gradient);
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state.stroke_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the line width. Non-finite or non-positive values are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Set the global alpha. Non-finite values or values outside `[0, 1]` are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    // --- Gradients ---

    /// Create a linear gradient.
    pub fn create_linear_gradient(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> CanvasGradient {
        CanvasGradient::new_linear(x0, y0, x1, y1)
    }
}

/// Parse a CSS color string into a tiny_skia::Color.
pub fn parse_color(s: &str) -> Canvas2dResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;

    let [r, g, b, a] = parsed.to_array();
    Ok(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK))
}
