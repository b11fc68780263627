//! Text rendering operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::parse_font;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{
    buffer_metrics, calculate_text_x_offset, calculate_text_y_offset, shape_text, TextMetrics,
};
use cosmic_text::Command;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Set the font from a CSS font string.
    ///
    /// On error the previous font is kept.
    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        self.state.font = parse_font(font)?;
        Ok(())
    }

    /// Set the text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    /// Set the text baseline.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Measure text in the current font.
    ///
    /// Without any loaded font faces every measurement is zero.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        if self.font_system.db().is_empty() {
            return TextMetrics::default();
        }
        crate::text::measure_text(&mut self.font_system, text, &self.state.font)
    }

    /// Fill text at the specified position with the current fill style.
    ///
    /// Glyphs are drawn as vector outlines and respect the active clip.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        if text.is_empty() {
            return;
        }
        if self.font_system.db().is_empty() {
            log::warn!(target: "canvas", "No font faces loaded, skipping text \"{}\"", text);
            return;
        }

        let font = self.state.font.clone();
        let buffer = shape_text(&mut self.font_system, text, &font);
        let metrics = buffer_metrics(&buffer, &font);

        let base_x = x + calculate_text_x_offset(metrics.width, self.state.text_align);
        let base_y = y + calculate_text_y_offset(
            metrics.ascent,
            metrics.descent,
            self.state.text_baseline,
        );

        let clip_mask = self.create_clip_mask();
        let style = self.state.fill_style.clone();
        self.with_paint_from_style(style, |ctx, paint| {
            for run in buffer.layout_runs() {
                for glyph in run.glyphs.iter() {
                    let physical_glyph = glyph.physical((base_x, base_y), 1.0);
                    let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                    let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                    let Some(commands) = ctx
                        .swash_cache
                        .get_outline_commands(&mut ctx.font_system, physical_glyph.cache_key)
                    else {
                        continue;
                    };

                    // Font outlines are y-up
                    let mut path_builder = tiny_skia::PathBuilder::new();
                    for cmd in commands {
                        match cmd {
                            Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                            Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                            Command::QuadTo(ctrl, end) => {
                                path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                            }
                            Command::CurveTo(c1, c2, end) => {
                                path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                            }
                            Command::Close => path_builder.close(),
                        }
                    }

                    if let Some(path) = path_builder.finish() {
                        ctx.pixmap.fill_path(
                            &path,
                            paint,
                            tiny_skia::FillRule::Winding,
                            Transform::from_translate(glyph_x, glyph_y),
                            clip_mask.as_ref(),
                        );
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::{Canvas2dContext, FontConfig};

    fn test_context() -> Canvas2dContext {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        Canvas2dContext::with_config(20, 20, config).unwrap()
    }

    #[test]
    fn test_set_font_error_keeps_previous() {
        let mut ctx = test_context();
        ctx.set_font("bold 32px sans-serif").unwrap();
        assert!(ctx.set_font("bold").is_err());
        assert_eq!(ctx.state().font.size_px, 32.0);
    }

    #[test]
    fn test_text_without_fonts_is_a_no_op() {
        let mut ctx = test_context();
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.fill_text("Hello", 2.0, 15.0);
        assert_eq!(ctx.measure_text("Hello").width, 0.0);
        assert_eq!(ctx.pixel(5, 10), Some([0, 0, 0, 0]));
    }
}
