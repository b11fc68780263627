//! Text shaping and measurement using cosmic-text.

use crate::font_parser::ParsedFont;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Family, FontSystem, Metrics, Shaping};

/// Text metrics returned by `measure_text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the text in pixels.
    pub width: f32,
    /// Distance from the baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
}

/// Family chosen from a CSS family list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResolvedFamily {
    Named(String),
    SansSerif,
    Serif,
    Monospace,
}

impl ResolvedFamily {
    pub(crate) fn as_family(&self) -> Family<'_> {
        match self {
            ResolvedFamily::Named(name) => Family::Name(name),
            ResolvedFamily::SansSerif => Family::SansSerif,
            ResolvedFamily::Serif => Family::Serif,
            ResolvedFamily::Monospace => Family::Monospace,
        }
    }
}

/// Pick the first family of the list that the font database can serve.
///
/// Generic names always match; named families must be present in the
/// database. Falls back to sans-serif.
pub(crate) fn resolve_family(font_system: &FontSystem, families: &[String]) -> ResolvedFamily {
    for family in families {
        match family.to_ascii_lowercase().as_str() {
            "sans-serif" | "system-ui" => return ResolvedFamily::SansSerif,
            "serif" => return ResolvedFamily::Serif,
            "monospace" => return ResolvedFamily::Monospace,
            _ => {}
        }
        let present = font_system.db().faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        });
        if present {
            return ResolvedFamily::Named(family.clone());
        }
    }
    ResolvedFamily::SansSerif
}

/// Shape a single line of text into a cosmic-text buffer.
pub(crate) fn shape_text(font_system: &mut FontSystem, text: &str, font: &ParsedFont) -> Buffer {
    let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);

    let family = resolve_family(font_system, &font.families);
    // Hinting off so glyph outlines match their unhinted advance widths
    let attrs = Attrs::new()
        .family(family.as_family())
        .weight(font.weight)
        .style(font.style)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    buffer
}

/// Width, ascent and descent of a shaped buffer.
pub(crate) fn buffer_metrics(buffer: &Buffer, font: &ParsedFont) -> TextMetrics {
    let mut metrics = TextMetrics::default();
    for run in buffer.layout_runs() {
        metrics.width = metrics.width.max(run.line_w);
        metrics.ascent = metrics.ascent.max(run.line_y - run.line_top);
        metrics.descent = metrics
            .descent
            .max((run.line_top + run.line_height) - run.line_y);
    }
    if metrics.ascent == 0.0 && metrics.descent == 0.0 {
        metrics.ascent = font.size_px * 0.8;
        metrics.descent = font.size_px * 0.2;
    }
    metrics
}

/// Measure text the way `measureText()` does.
pub fn measure_text(font_system: &mut FontSystem, text: &str, font: &ParsedFont) -> TextMetrics {
    let buffer = shape_text(font_system, text, font);
    buffer_metrics(&buffer, font)
}

/// X offset applied to the anchor for the given alignment.
pub fn calculate_text_x_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left | TextAlign::Start => 0.0,
        TextAlign::Right | TextAlign::End => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Y offset from the anchor to the alphabetic baseline.
///
/// Glyph outlines are positioned with their origin on the baseline.
pub fn calculate_text_y_offset(ascent: f32, descent: f32, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => -descent,
    }
}
