//! Path building operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::geometry::{ArcParams, CornerRadius, RectParams, RoundRectParams};
use kurbo::PathEl;
use std::f64::consts::TAU;

/// Flattening tolerance passed to kurbo when converting arcs to cubics.
const ARC_TOLERANCE: f64 = 0.1;

impl Canvas2dContext {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path_builder = tiny_skia::PathBuilder::new();
        self.has_current_point = false;
    }

    /// Move to a point without drawing.
    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        self.path_builder.move_to(x, y);
        self.has_current_point = true;
    }

    /// Draw a line to a point. Without a current point this behaves as `move_to`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        if self.has_current_point {
            self.path_builder.line_to(x, y);
        } else {
            self.move_to(x, y);
        }
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.path_builder.close();
    }

    /// Add a rectangle to the path.
    pub fn rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "rect {} {} {} {}", params.x, params.y, params.width, params.height);
        let RectParams {
            x,
            y,
            width,
            height,
        } = *params;

        self.path_builder.move_to(x, y);
        self.path_builder.line_to(x + width, y);
        self.path_builder.line_to(x + width, y + height);
        self.path_builder.line_to(x, y + height);
        self.path_builder.close();
        self.has_current_point = true;
    }

    /// Add a rounded rectangle to the path.
    ///
    /// Radii larger than the rectangle allows are scaled down uniformly, so a
    /// radius of `height / 2` produces a pill shape.
    pub fn round_rect(&mut self, params: &RoundRectParams) {
        log::debug!(target: "canvas", "roundRect {} {} {} {}", params.x, params.y, params.width, params.height);

        // Handle negative dimensions by adjusting position
        let (x, width) = if params.width < 0.0 {
            (params.x + params.width, -params.width)
        } else {
            (params.x, params.width)
        };
        let (y, height) = if params.height < 0.0 {
            (params.y + params.height, -params.height)
        } else {
            (params.y, params.height)
        };

        let [mut tl, mut tr, mut br, mut bl] = params.radii.map(|r| CornerRadius {
            x: r.x.max(0.0),
            y: r.y.max(0.0),
        });

        let top = (tl.x + tr.x).max(1e-10);
        let bottom = (bl.x + br.x).max(1e-10);
        let left = (tl.y + bl.y).max(1e-10);
        let right = (tr.y + br.y).max(1e-10);
        let scale = (width / top)
            .min(width / bottom)
            .min(height / left)
            .min(height / right)
            .min(1.0);

        if scale < 1.0 {
            for corner in [&mut tl, &mut tr, &mut br, &mut bl] {
                corner.x *= scale;
                corner.y *= scale;
            }
        }

        // Kappa for quarter-ellipse cubic Bezier approximation
        const K: f32 = 0.552_284_8;
        let pb = &mut self.path_builder;

        pb.move_to(x + tl.x, y);
        pb.line_to(x + width - tr.x, y);
        if tr.x > 0.0 || tr.y > 0.0 {
            pb.cubic_to(
                x + width - tr.x + tr.x * K,
                y,
                x + width,
                y + tr.y - tr.y * K,
                x + width,
                y + tr.y,
            );
        }

        pb.line_to(x + width, y + height - br.y);
        if br.x > 0.0 || br.y > 0.0 {
            pb.cubic_to(
                x + width,
                y + height - br.y + br.y * K,
                x + width - br.x + br.x * K,
                y + height,
                x + width - br.x,
                y + height,
            );
        }

        pb.line_to(x + bl.x, y + height);
        if bl.x > 0.0 || bl.y > 0.0 {
            pb.cubic_to(
                x + bl.x - bl.x * K,
                y + height,
                x,
                y + height - bl.y + bl.y * K,
                x,
                y + height - bl.y,
            );
        }

        pb.line_to(x, y + tl.y);
        if tl.x > 0.0 || tl.y > 0.0 {
            pb.cubic_to(x, y + tl.y - tl.y * K, x + tl.x - tl.x * K, y, x + tl.x, y);
        }

        pb.close();
        self.has_current_point = true;
    }

    /// Add a circular arc to the path.
    ///
    /// Connects from the current point with a straight line, or starts a new
    /// subpath when there is none. Non-positive radii are ignored.
    pub fn arc(&mut self, params: &ArcParams) {
        log::debug!(target: "canvas", "arc {} {} r={}", params.x, params.y, params.radius);
        if params.radius.is_nan() || params.radius <= 0.0 {
            return;
        }

        let sweep = arc_sweep(
            params.start_angle as f64,
            params.end_angle as f64,
            params.anticlockwise,
        );
        let arc = kurbo::Arc {
            center: kurbo::Point::new(params.x as f64, params.y as f64),
            radii: kurbo::Vec2::new(params.radius as f64, params.radius as f64),
            start_angle: params.start_angle as f64,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };

        let start_x = params.x + params.radius * params.start_angle.cos();
        let start_y = params.y + params.radius * params.start_angle.sin();
        self.line_to(start_x, start_y);

        for el in arc.append_iter(ARC_TOLERANCE) {
            match el {
                PathEl::LineTo(p) => self.path_builder.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(c, p) => {
                    self.path_builder
                        .quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32)
                }
                PathEl::CurveTo(c1, c2, p) => self.path_builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                ),
                PathEl::MoveTo(_) | PathEl::ClosePath => {}
            }
        }
    }
}

/// Signed sweep angle for a canvas arc. Sweeps of a full turn or more are
/// clamped to exactly one turn.
fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    let delta = end - start;
    if anticlockwise {
        if -delta >= TAU {
            -TAU
        } else {
            let d = delta.rem_euclid(TAU);
            if d == 0.0 {
                0.0
            } else {
                d - TAU
            }
        }
    } else if delta >= TAU {
        TAU
    } else {
        delta.rem_euclid(TAU)
    }
}
