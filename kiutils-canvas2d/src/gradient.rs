//! Linear gradients for Canvas 2D fills.

use crate::context::parse_color;
use crate::error::{Canvas2dError, Canvas2dResult};

/// A color stop in a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: tiny_skia::Color,
}

/// Linear gradient running from `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Color stops, kept sorted by offset.
    pub stops: Vec<GradientStop>,
}

impl CanvasGradient {
    /// Create a new linear gradient with no stops.
    pub fn new_linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::new(),
        }
    }

    /// Add a color stop from a CSS color string.
    ///
    /// Offsets outside `[0, 1]` (or NaN) are rejected.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Canvas2dResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::InvalidGradientStop(offset));
        }
        let color = parse_color(color)?;
        self.stops.push(GradientStop { offset, color });
        // Stable sort keeps insertion order for equal offsets
        self.stops.sort_by(|a, b| {
            a.offset
                .partial_cmp(&b.offset)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }

    /// Length of the gradient line.
    pub fn span(&self) -> f32 {
        ((self.x1 - self.x0).powi(2) + (self.y1 - self.y0).powi(2)).sqrt()
    }

    pub(crate) fn to_shader(&self, global_alpha: f32) -> Option<tiny_skia::Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }

        let stops: Vec<tiny_skia::GradientStop> = self
            .stops
            .iter()
            .map(|stop| {
                let mut color = stop.color;
                if global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * global_alpha).clamp(0.0, 1.0));
                }
                tiny_skia::GradientStop::new(stop.offset as f32, color)
            })
            .collect();

        tiny_skia::LinearGradient::new(
            tiny_skia::Point {
                x: self.x0,
                y: self.y0,
            },
            tiny_skia::Point {
                x: self.x1,
                y: self.y1,
            },
            stops,
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_sorted_by_offset() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        gradient.add_color_stop(1.0, "#0000ff").unwrap();
        gradient.add_color_stop(0.0, "#ff0000").unwrap();
        gradient.add_color_stop(0.5, "#00ff00").unwrap();

        let offsets: Vec<f64> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_reject_out_of_range_offset() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        assert!(matches!(
            gradient.add_color_stop(1.5, "#ffffff"),
            Err(Canvas2dError::InvalidGradientStop(_))
        ));
        assert!(matches!(
            gradient.add_color_stop(f64::NAN, "#ffffff"),
            Err(Canvas2dError::InvalidGradientStop(_))
        ));
        assert!(gradient.stops.is_empty());
    }

    #[test]
    fn test_reject_bad_color() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        assert!(matches!(
            gradient.add_color_stop(0.0, "not-a-color"),
            Err(Canvas2dError::ColorParseError(_))
        ));
    }

    #[test]
    fn test_empty_gradient_has_no_shader() {
        let gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        assert!(gradient.to_shader(1.0).is_none());
        assert_eq!(gradient.span(), 100.0);
    }
}
