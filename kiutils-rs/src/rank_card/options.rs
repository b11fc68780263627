//! Rank card options as supplied by callers, and their resolved form.
//!
//! [`RankCardOptions`] mirrors the JSON accepted by the card: every field is
//! optional and keys are camelCase. [`RankCardOptions::resolve`] merges it
//! field by field onto the defaults, producing a [`RankCardConfig`] the
//! renderer can read without further checks.

use crate::image_loading::ImageSource;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WIDTH: u32 = 934;
pub const DEFAULT_HEIGHT: u32 = 282;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#23272A";
pub const DEFAULT_TRACK_COLOR: &str = "#484b4e";
pub const DEFAULT_BAR_COLOR: &str = "#5865F2";
pub const DEFAULT_OVERLAY_COLOR: &str = "#1E2124";
pub const DEFAULT_OVERLAY_LEVEL: f32 = 0.3;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_SUBTLE_COLOR: &str = "#A3A6AA";

// ---------------------------------------------------------------------------
// Partial options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankCardOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<BackgroundOptions>,
    pub progress_bar: Option<ProgressBarOptions>,
    pub overlay: Option<OverlayOptions>,
    pub avatar: Option<AvatarOptions>,
    pub status: Option<StatusOptions>,
    pub rank: Option<StatOptions>,
    pub level: Option<StatOptions>,
    #[serde(rename = "currentXP")]
    pub current_xp: Option<XpOptions>,
    #[serde(rename = "requiredXP")]
    pub required_xp: Option<XpOptions>,
    pub username: Option<UsernameOptions>,
    pub discriminator: Option<DiscriminatorOptions>,
    /// Accepted for compatibility; emoji rendering is not implemented.
    pub render_emojis: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Image,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    #[serde(rename = "type")]
    pub kind: Option<BackgroundKind>,
    /// A CSS color for `color` backgrounds, a path or URL for `image` ones.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    Color,
    Gradient,
}

/// A single color or a list of colors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorList {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackOptions {
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    #[serde(rename = "type")]
    pub kind: Option<BarKind>,
    pub color: Option<ColorList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgressBarOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rounded: Option<bool>,
    pub track: Option<TrackOptions>,
    pub bar: Option<BarOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub display: Option<bool>,
    pub level: Option<f32>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AvatarOptions {
    pub source: Option<ImageSource>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Online,
    Dnd,
    Idle,
    Offline,
    Streaming,
}

impl StatusType {
    /// Badge color shown for this status.
    pub fn color(self) -> &'static str {
        match self {
            StatusType::Online => "#43b581",
            StatusType::Dnd => "#f04747",
            StatusType::Idle => "#faa61a",
            StatusType::Streaming => "#6441a5",
            StatusType::Offline => "#747f8d",
        }
    }
}

impl FromStr for StatusType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Ok(StatusType::Online),
            "dnd" => Ok(StatusType::Dnd),
            "idle" => Ok(StatusType::Idle),
            "offline" => Ok(StatusType::Offline),
            "streaming" => Ok(StatusType::Streaming),
            other => Err(format!("unknown status type: {other}")),
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusType::Online => "online",
            StatusType::Dnd => "dnd",
            StatusType::Idle => "idle",
            StatusType::Offline => "offline",
            StatusType::Streaming => "streaming",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusOptions {
    /// Missing or `null` falls back to online.
    #[serde(rename = "type")]
    pub kind: Option<StatusType>,
    pub color: Option<String>,
    pub width: Option<f32>,
    /// Accepted for compatibility; the badge is always drawn as a circle.
    pub circle: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatOptions {
    pub display: Option<bool>,
    /// Any JSON number; fractions are floored and negatives clamp to zero.
    pub data: Option<f64>,
    pub display_text: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct XpOptions {
    pub data: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsernameOptions {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Discriminators arrive as either strings (`"0001"`) or numbers (`1`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Discrim {
    Text(String),
    Number(u64),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscriminatorOptions {
    pub discrim: Option<Discrim>,
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(String),
    Image(ImageSource),
}

/// Progress bar fill. A gradient always carries at least two colors.
#[derive(Debug, Clone, PartialEq)]
pub enum BarFill {
    Solid(String),
    Gradient(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rounded: bool,
    pub track_color: String,
    pub fill: BarFill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub source: Option<ImageSource>,
    /// Kept from the input; the avatar is always placed at a fixed inset.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusType,
    pub color: String,
    /// Badge size factor: outer radius is `width * 4`, inner `width * 3`.
    pub width: f32,
    pub circle: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub display: bool,
    pub value: u64,
    pub label: String,
    pub label_color: String,
    pub value_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Xp {
    pub value: u64,
    /// Only the current XP color is drawn; it covers both XP strings.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Username {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    /// Empty disables the discriminator.
    pub value: String,
    pub color: String,
}

/// Fully resolved rank card configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCardConfig {
    pub width: u32,
    pub height: u32,
    pub background: Background,
    pub progress_bar: ProgressBar,
    pub overlay: Option<Overlay>,
    pub avatar: Avatar,
    /// Always set by [`RankCardOptions::resolve`]; `None` draws no badge.
    pub status: Option<Status>,
    pub rank: StatLine,
    pub level: StatLine,
    pub current_xp: Xp,
    pub required_xp: Xp,
    pub username: Username,
    pub discriminator: Discriminator,
    pub render_emojis: bool,
}

impl Default for RankCardConfig {
    fn default() -> Self {
        RankCardOptions::default().resolve()
    }
}

fn color_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl RankCardOptions {
    /// Merge these options onto the defaults.
    pub fn resolve(self) -> RankCardConfig {
        let background = resolve_background(self.background.unwrap_or_default());
        let progress_bar = resolve_progress_bar(self.progress_bar.unwrap_or_default());

        let overlay = self.overlay.unwrap_or_default();
        let overlay = overlay.display.unwrap_or(true).then(|| Overlay {
            // Zero counts as unset, like a missing level
            opacity: overlay
                .level
                .filter(|l| l.is_finite() && *l != 0.0)
                .unwrap_or(DEFAULT_OVERLAY_LEVEL)
                .clamp(0.0, 1.0),
            color: color_or(overlay.color, DEFAULT_OVERLAY_COLOR),
        });

        let avatar = self.avatar.unwrap_or_default();
        let positive = |v: Option<f32>| v.filter(|v| v.is_finite() && *v > 0.0);
        let avatar = Avatar {
            source: avatar.source.filter(|s| !s.is_empty()),
            x: avatar.x.unwrap_or(42.0),
            y: avatar.y.unwrap_or(45.0),
            width: positive(avatar.width).unwrap_or(200.0),
            height: positive(avatar.height).unwrap_or(200.0),
        };

        let status = self.status.unwrap_or_default();
        let circle = status.circle.unwrap_or(true);
        let width = positive(status.width).unwrap_or(5.0);
        let kind = status.kind.unwrap_or(StatusType::Online);
        let status = Some(Status {
            kind,
            color: color_or(status.color, kind.color()),
            width,
            circle,
        });

        let username = self.username.unwrap_or_default();
        let discriminator = self.discriminator.unwrap_or_default();
        let discrim = match discriminator.discrim {
            Some(Discrim::Text(text)) => text,
            Some(Discrim::Number(n)) => n.to_string(),
            None => "0000".to_string(),
        };

        RankCardConfig {
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            background,
            progress_bar,
            overlay,
            avatar,
            status,
            rank: resolve_stat(self.rank.unwrap_or_default(), "RANK"),
            level: resolve_stat(self.level.unwrap_or_default(), "LEVEL"),
            current_xp: resolve_xp(self.current_xp.unwrap_or_default(), 0),
            required_xp: resolve_xp(self.required_xp.unwrap_or_default(), 100),
            username: Username {
                name: username
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "User".to_string()),
                color: color_or(username.color, DEFAULT_TEXT_COLOR),
            },
            discriminator: Discriminator {
                value: discrim,
                color: color_or(discriminator.color, DEFAULT_SUBTLE_COLOR),
            },
            render_emojis: self.render_emojis.unwrap_or(false),
        }
    }
}

fn resolve_background(options: BackgroundOptions) -> Background {
    match (options.kind.unwrap_or(BackgroundKind::Color), options.image) {
        (BackgroundKind::Image, Some(image)) if !image.is_empty() => {
            Background::Image(ImageSource::from(image))
        }
        (BackgroundKind::Color, image) => Background::Color(color_or(image, DEFAULT_BACKGROUND_COLOR)),
        (BackgroundKind::Image, _) => Background::Color(DEFAULT_BACKGROUND_COLOR.to_string()),
    }
}

fn resolve_progress_bar(options: ProgressBarOptions) -> ProgressBar {
    let bar = options.bar.unwrap_or_default();
    let colors = match bar.color {
        Some(ColorList::One(color)) => vec![color],
        Some(ColorList::Many(colors)) => colors,
        None => Vec::new(),
    };
    let colors: Vec<String> = colors.into_iter().filter(|c| !c.is_empty()).collect();

    let fill = match (bar.kind.unwrap_or(BarKind::Color), colors.len()) {
        (_, 0) => BarFill::Solid(DEFAULT_BAR_COLOR.to_string()),
        (BarKind::Gradient, n) if n >= 2 => BarFill::Gradient(colors),
        (_, _) => BarFill::Solid(colors[0].clone()),
    };

    ProgressBar {
        x: options.x.unwrap_or(275.5),
        y: options.y.unwrap_or(170.0),
        width: options.width.unwrap_or(596.5),
        height: options.height.unwrap_or(25.0),
        rounded: options.rounded.unwrap_or(true),
        track_color: color_or(
            options.track.and_then(|t| t.color),
            DEFAULT_TRACK_COLOR,
        ),
        fill,
    }
}

/// Floor to a non-negative integer; NaN becomes zero.
fn whole_number(value: f64) -> u64 {
    // `as` saturates at u64::MAX
    value.max(0.0).floor() as u64
}

fn resolve_stat(options: StatOptions, label: &str) -> StatLine {
    StatLine {
        display: options.display.unwrap_or(true),
        value: options.data.map_or(1, whole_number),
        label: options
            .display_text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| label.to_string()),
        label_color: color_or(options.color, DEFAULT_SUBTLE_COLOR),
        value_color: color_or(options.text_color, DEFAULT_TEXT_COLOR),
    }
}

fn resolve_xp(options: XpOptions, default: u64) -> Xp {
    Xp {
        value: options.data.map_or(default, whole_number),
        color: color_or(options.color, DEFAULT_SUBTLE_COLOR),
    }
}
