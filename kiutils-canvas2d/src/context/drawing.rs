//! Fill, stroke, clip, and paint helper operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::geometry::RectParams;
use crate::style::FillStyle;
use tiny_skia::{FillRule, Transform};

impl Canvas2dContext {
    // --- Clipping ---

    /// Intersect the clipping region with the current path.
    ///
    /// The path builder is left intact so the same path can be stroked afterwards.
    pub fn clip(&mut self) {
        log::debug!(target: "canvas", "clip");
        if let Some(path) = self.path_builder.clone().finish() {
            self.state.clip_paths.push(path);
        }
    }

    // --- Drawing operations ---

    /// Fill the current path using the non-zero winding rule.
    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        // Clone the path builder so we don't consume it - stroke() may follow
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };

        let clip_mask = self.create_clip_mask();
        let style = self.state.fill_style.clone();
        self.with_paint_from_style(style, |ctx, paint| {
            ctx.pixmap.fill_path(
                &path,
                paint,
                FillRule::Winding,
                Transform::identity(),
                clip_mask.as_ref(),
            );
        });
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };

        let stroke = tiny_skia::Stroke {
            width: self.state.line_width,
            ..Default::default()
        };

        let clip_mask = self.create_clip_mask();
        let style = self.state.stroke_style.clone();
        self.with_paint_from_style(style, |ctx, paint| {
            ctx.pixmap.stroke_path(
                &path,
                paint,
                &stroke,
                Transform::identity(),
                clip_mask.as_ref(),
            );
        });
    }

    /// Fill a rectangle with the current fill style.
    ///
    /// Replaces the current path.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", params.x, params.y, params.width, params.height);
        self.begin_path();
        self.rect(params);
        self.fill();
    }

    // --- Private paint helpers ---

    /// Mask covering the intersection of every active clip path, or `None`
    /// when nothing is clipped.
    pub(crate) fn create_clip_mask(&self) -> Option<tiny_skia::Mask> {
        let (first, rest) = self.state.clip_paths.split_first()?;
        let mut mask = tiny_skia::Mask::new(self.width, self.height)?;
        mask.fill_path(first, FillRule::Winding, true, Transform::identity());
        for path in rest {
            mask.intersect_path(path, FillRule::Winding, true, Transform::identity());
        }
        Some(mask)
    }

    /// Build a paint for `style` with global alpha applied and hand it to `draw`.
    ///
    /// Returns `None` without drawing when the style cannot produce a shader,
    /// e.g. a gradient with no color stops.
    pub(crate) fn with_paint_from_style<R>(
        &mut self,
        style: FillStyle,
        draw: impl for<'a> FnOnce(&mut Self, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };

        match style {
            FillStyle::Color(mut color) => {
                if self.state.global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * self.state.global_alpha).clamp(0.0, 1.0));
                }
                paint.set_color(color);
            }
            FillStyle::LinearGradient(gradient) => {
                paint.shader = gradient.to_shader(self.state.global_alpha)?;
            }
        }
        Some(draw(self, &paint))
    }
}
