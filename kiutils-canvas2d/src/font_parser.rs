//! CSS font shorthand parsing.
//!
//! Handles the subset used by the rank card: `[italic] [bold|<weight>] <size>px <families>`,
//! e.g. `"bold 32px 'Segoe UI', Tahoma, sans-serif"`.

use crate::error::{Canvas2dError, Canvas2dResult};
use cosmic_text::{Style, Weight};

/// A parsed CSS `font` shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    pub style: Style,
    pub weight: Weight,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference, quotes removed.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

/// Parse a CSS font string into components.
pub fn parse_font(font_str: &str) -> Canvas2dResult<ParsedFont> {
    let font_str = font_str.trim();
    if font_str.is_empty() {
        return Ok(ParsedFont::default());
    }

    let mut result = ParsedFont::default();
    let mut remaining = font_str;

    // Style and weight keywords may appear in any order before the size
    loop {
        let trimmed = remaining.trim_start();
        let (word, rest) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };
        match word {
            "italic" => result.style = Style::Italic,
            "oblique" => result.style = Style::Oblique,
            "normal" | "small-caps" => {}
            "bold" => result.weight = Weight::BOLD,
            "bolder" => result.weight = Weight::EXTRA_BOLD,
            "lighter" => result.weight = Weight::LIGHT,
            _ => match parse_numeric_weight(word) {
                Some(weight) => result.weight = weight,
                None => break,
            },
        }
        remaining = rest;
    }

    let (size, rest) = parse_font_size(remaining.trim_start())?;
    result.size_px = size;

    let mut remaining = rest.trim_start();
    if let Some(rest) = remaining.strip_prefix('/') {
        // Line height is irrelevant for single-line canvas text
        remaining = rest
            .find(char::is_whitespace)
            .map(|idx| &rest[idx..])
            .unwrap_or("")
            .trim_start();
    }

    if !remaining.is_empty() {
        result.families = parse_font_families(remaining);
    }

    Ok(result)
}

fn parse_numeric_weight(word: &str) -> Option<Weight> {
    let weight: u16 = word.parse().ok()?;
    if (100..=900).contains(&weight) && weight % 100 == 0 {
        Some(Weight(weight))
    } else {
        None
    }
}

/// Parse `<number><unit>` and return the size in pixels plus the remaining input.
fn parse_font_size(s: &str) -> Canvas2dResult<(f32, &str)> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if num_end == 0 {
        return Err(Canvas2dError::FontParseError(format!(
            "Expected font size, got: {}",
            s
        )));
    }

    let size: f32 = s[..num_end].parse().map_err(|_| {
        Canvas2dError::FontParseError(format!("Invalid font size number: {}", &s[..num_end]))
    })?;
    let rest = &s[num_end..];

    let (multiplier, unit_len) = if rest.starts_with("px") {
        (1.0, 2)
    } else if rest.starts_with("pt") {
        (4.0 / 3.0, 2)
    } else if rest.starts_with("em") {
        (16.0, 2)
    } else {
        (1.0, 0)
    };

    Ok((size * multiplier, &rest[unit_len..]))
}

fn parse_font_families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| family.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|family| !family.is_empty())
        .map(str::to_string)
        .collect()
}
