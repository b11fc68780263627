//! Canvas 2D drawing surface built on tiny-skia and cosmic-text.
//!
//! This crate implements the slice of the Canvas 2D API that kiutils needs to
//! render rank cards without a browser or a native canvas binding. It uses:
//! - `tiny-skia` for rasterization, clipping and gradients
//! - `cosmic-text` for text shaping, measurement and glyph outlines
//! - `fontdb` for font discovery (shared between contexts via [`ResolvedFontConfig`])
//!
//! # Example
//!
//! ```rust,ignore
//! use kiutils_canvas2d::{Canvas2dContext, RectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.fill_rect(&RectParams { x: 10.0, y: 10.0, width: 100.0, height: 50.0 });
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod drawing_state;
mod error;
mod font_config;
mod font_parser;
mod geometry;
mod gradient;
mod style;
mod text;

// Re-export public API
pub use context::{parse_color, Canvas2dContext};
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig};
pub use font_parser::{parse_font, ParsedFont};
pub use geometry::{ArcParams, CanvasPixmapRef, CornerRadius, RectParams, RoundRectParams};
pub use gradient::{CanvasGradient, GradientStop};
pub use style::{FillStyle, TextAlign, TextBaseline};
pub use text::TextMetrics;
