//! Card geometry: layout constants and the derived positions of each element.

use kiutils_canvas2d::RectParams;

pub const CARD_CORNER_RADIUS: f32 = 16.0;
pub const AVATAR_LEFT: f32 = 55.0;
pub const AVATAR_BORDER_WIDTH: f32 = 4.0;
pub const AVATAR_BORDER_COLOR: &str = "#ffffff26";
pub const STATUS_INSET: f32 = 20.0;
pub const STATUS_RING_COLOR: &str = "#2A2C31";
pub const TEXT_ANCHOR_X: f32 = 275.0;
pub const USERNAME_BASELINE_Y: f32 = 100.0;
pub const DISCRIMINATOR_GAP: f32 = 50.0;
pub const STAT_ROW_OFFSET_Y: f32 = 35.0;
pub const LEVEL_VALUE_OFFSET_X: f32 = 70.0;
pub const RANK_LABEL_OFFSET_X: f32 = 140.0;
pub const RANK_VALUE_OFFSET_X: f32 = 205.0;
pub const XP_TEXT_OFFSET_Y: f32 = 20.0;

pub const FONT_FAMILIES: &str = "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif";

/// CSS font string for text drawn on the card.
pub fn card_font(style: &str) -> String {
    format!("{style} {FONT_FAMILIES}")
}

/// Fraction of the bar that is filled, in `[0, 1]`.
///
/// A required XP of zero counts as one.
pub fn progress(current: u64, required: u64) -> f64 {
    (current as f64 / required.max(1) as f64).min(1.0)
}

/// Progress as a whole percentage, e.g. `"60%"`.
pub fn percentage_text(progress: f64) -> String {
    format!("{}%", (progress * 100.0).round() as u32)
}

pub fn xp_text(current: u64, required: u64) -> String {
    format!("XP: {current} / {required}")
}

/// Corner radius for the track and fill: a pill when rounded, square otherwise.
pub fn bar_corner_radius(width: f32, height: f32, rounded: bool) -> f32 {
    if rounded {
        (height / 2.0).min(width / 2.0).max(0.0)
    } else {
        0.0
    }
}

/// Avatar box: fixed left inset, vertically centered on the card.
pub fn avatar_box(card_height: u32, avatar_width: f32, avatar_height: f32) -> RectParams {
    RectParams {
        x: AVATAR_LEFT,
        y: card_height as f32 / 2.0 - avatar_height / 2.0,
        width: avatar_width,
        height: avatar_height,
    }
}

/// Center of the status badge, inset from the avatar's bottom right corner.
pub fn status_badge_center(avatar: &RectParams) -> (f32, f32) {
    (
        avatar.x + avatar.width - STATUS_INSET,
        avatar.y + avatar.height - STATUS_INSET,
    )
}

/// Evenly spaced gradient stop offsets for `count` colors.
pub fn gradient_offsets(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// X position of the discriminator given the measured username width.
pub fn discriminator_x(username_width: f32) -> f32 {
    TEXT_ANCHOR_X + username_width + DISCRIMINATOR_GAP
}
