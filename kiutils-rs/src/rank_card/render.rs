//! Drawing a resolved rank card onto a canvas and encoding it as PNG.

use super::layout::{
    avatar_box, bar_corner_radius, card_font, discriminator_x, gradient_offsets, percentage_text,
    progress, status_badge_center, xp_text, AVATAR_BORDER_COLOR, AVATAR_BORDER_WIDTH,
    CARD_CORNER_RADIUS, LEVEL_VALUE_OFFSET_X, RANK_LABEL_OFFSET_X, RANK_VALUE_OFFSET_X,
    STATUS_RING_COLOR, STAT_ROW_OFFSET_Y, TEXT_ANCHOR_X, USERNAME_BASELINE_Y, XP_TEXT_OFFSET_Y,
};
use super::options::{
    Background, BarFill, RankCardConfig, RankCardOptions, Status, DEFAULT_BACKGROUND_COLOR,
};
use crate::error::Result;
use crate::image_loading::{ImageLoader, ImageSource, LoadedImage};
use kiutils_canvas2d::{
    ArcParams, Canvas2dContext, FontConfig, RectParams, ResolvedFontConfig, RoundRectParams,
    TextAlign,
};
use log::{debug, warn};

/// What to do when an image used by the card cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFailurePolicy {
    /// Abort the render with the load error.
    Fail,
    /// Log a warning and leave the element out.
    Skip,
}

/// Failure policy per image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPolicy {
    pub background: AssetFailurePolicy,
    pub avatar: AssetFailurePolicy,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            background: AssetFailurePolicy::Fail,
            avatar: AssetFailurePolicy::Skip,
        }
    }
}

/// Renders rank cards to PNG.
///
/// The font database is scanned once at construction and shared by clones;
/// each render draws on a fresh surface, so a renderer can serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct RankCardRenderer {
    fonts: ResolvedFontConfig,
    loader: ImageLoader,
    policy: RenderPolicy,
}

impl Default for RankCardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RankCardRenderer {
    /// Renderer using the system fonts.
    pub fn new() -> Self {
        Self::with_font_config(FontConfig::default())
    }

    pub fn with_font_config(config: FontConfig) -> Self {
        let fonts = config.resolve();
        debug!("Rank card renderer using {} font faces", fonts.face_count());
        Self {
            fonts,
            loader: ImageLoader::default(),
            policy: RenderPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_loader(mut self, loader: ImageLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Resolve `options` against the defaults and render the card.
    pub async fn render(&self, options: RankCardOptions) -> Result<Vec<u8>> {
        self.render_config(&options.resolve()).await
    }

    /// Render an already resolved card, returning PNG bytes.
    pub async fn render_config(&self, config: &RankCardConfig) -> Result<Vec<u8>> {
        let background = match &config.background {
            Background::Image(source) => {
                self.load_asset("background", source, self.policy.background)
                    .await?
            }
            Background::Color(_) => None,
        };
        let avatar = match &config.avatar.source {
            Some(source) => self.load_asset("avatar", source, self.policy.avatar).await?,
            None => None,
        };

        self.paint(config, background.as_ref(), avatar.as_ref())
    }

    async fn load_asset(
        &self,
        kind: &str,
        source: &ImageSource,
        policy: AssetFailurePolicy,
    ) -> Result<Option<LoadedImage>> {
        match self.loader.load(source).await {
            Ok(image) => Ok(Some(image)),
            Err(err) => match policy {
                AssetFailurePolicy::Fail => Err(err.into()),
                AssetFailurePolicy::Skip => {
                    warn!("Failed to load {kind} image, leaving it out: {err}");
                    Ok(None)
                }
            },
        }
    }

    fn paint(
        &self,
        config: &RankCardConfig,
        background: Option<&LoadedImage>,
        avatar: Option<&LoadedImage>,
    ) -> Result<Vec<u8>> {
        let mut ctx = Canvas2dContext::with_resolved(config.width, config.height, &self.fonts)?;
        let (width, height) = (config.width as f32, config.height as f32);
        let card = RectParams {
            x: 0.0,
            y: 0.0,
            width,
            height,
        };

        ctx.begin_path();
        ctx.round_rect(&RoundRectParams::uniform(
            0.0,
            0.0,
            width,
            height,
            CARD_CORNER_RADIUS,
        ));
        ctx.clip();

        match (background, &config.background) {
            (Some(image), _) => {
                ctx.draw_image_scaled(image.as_pixmap_ref(), 0.0, 0.0, width, height)?
            }
            (None, Background::Color(color)) => {
                ctx.set_fill_style(color)?;
                ctx.fill_rect(&card);
            }
            (None, Background::Image(_)) => {
                ctx.set_fill_style(DEFAULT_BACKGROUND_COLOR)?;
                ctx.fill_rect(&card);
            }
        }

        if let Some(overlay) = &config.overlay {
            ctx.set_fill_style(&overlay.color)?;
            ctx.set_global_alpha(overlay.opacity);
            ctx.fill_rect(&card);
            ctx.set_global_alpha(1.0);
        }

        if let Some(image) = avatar {
            draw_avatar(&mut ctx, config, image)?;
        }

        draw_labels(&mut ctx, config)?;
        draw_progress(&mut ctx, config)?;

        Ok(ctx.to_png(None)?)
    }
}

fn draw_avatar(ctx: &mut Canvas2dContext, config: &RankCardConfig, image: &LoadedImage) -> Result<()> {
    let bounds = avatar_box(config.height, config.avatar.width, config.avatar.height);

    ctx.save();
    ctx.begin_path();
    ctx.arc(&ArcParams::circle(
        bounds.x + bounds.width / 2.0,
        bounds.y + bounds.height / 2.0,
        bounds.width / 2.0,
    ));
    ctx.close_path();
    ctx.clip();
    ctx.draw_image_scaled(
        image.as_pixmap_ref(),
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
    )?;
    ctx.set_stroke_style(AVATAR_BORDER_COLOR)?;
    ctx.set_line_width(AVATAR_BORDER_WIDTH);
    ctx.stroke();
    ctx.restore();

    if let Some(status) = &config.status {
        draw_status_badge(ctx, &bounds, status)?;
    }
    Ok(())
}

fn draw_status_badge(ctx: &mut Canvas2dContext, avatar: &RectParams, status: &Status) -> Result<()> {
    let (cx, cy) = status_badge_center(avatar);

    ctx.begin_path();
    ctx.arc(&ArcParams::circle(cx, cy, status.width * 4.0));
    ctx.set_fill_style(STATUS_RING_COLOR)?;
    ctx.fill();

    ctx.begin_path();
    ctx.arc(&ArcParams::circle(cx, cy, status.width * 3.0));
    ctx.set_fill_style(&status.color)?;
    ctx.fill();
    Ok(())
}

fn draw_labels(ctx: &mut Canvas2dContext, config: &RankCardConfig) -> Result<()> {
    ctx.set_text_align(TextAlign::Left);

    ctx.set_font(&card_font("bold 32px"))?;
    ctx.set_fill_style(&config.username.color)?;
    ctx.fill_text(&config.username.name, TEXT_ANCHOR_X, USERNAME_BASELINE_Y);

    if !config.discriminator.value.is_empty() {
        // Username width is taken in the discriminator's 18px font
        ctx.set_font(&card_font("18px"))?;
        let username_width = ctx.measure_text(&config.username.name).width;
        ctx.set_fill_style(&config.discriminator.color)?;
        ctx.fill_text(
            &format!("#{}", config.discriminator.value),
            discriminator_x(username_width),
            USERNAME_BASELINE_Y,
        );
    }

    let row_y = USERNAME_BASELINE_Y + STAT_ROW_OFFSET_Y;

    let level = &config.level;
    if level.display {
        ctx.set_font(&card_font("18px"))?;
        ctx.set_fill_style(&level.label_color)?;
        ctx.fill_text(&level.label, TEXT_ANCHOR_X, row_y);

        ctx.set_font(&card_font("bold 24px"))?;
        ctx.set_fill_style(&level.value_color)?;
        ctx.fill_text(
            &level.value.to_string(),
            TEXT_ANCHOR_X + LEVEL_VALUE_OFFSET_X,
            row_y,
        );
    }

    let rank = &config.rank;
    if rank.display {
        ctx.set_font(&card_font("18px"))?;
        ctx.set_fill_style(&rank.label_color)?;
        ctx.fill_text(&rank.label, TEXT_ANCHOR_X + RANK_LABEL_OFFSET_X, row_y);

        ctx.set_font(&card_font("bold 22px"))?;
        ctx.set_fill_style(&rank.value_color)?;
        ctx.fill_text(
            &format!("#{}", rank.value),
            TEXT_ANCHOR_X + RANK_VALUE_OFFSET_X,
            row_y,
        );
    }
    Ok(())
}

fn bar_path(ctx: &mut Canvas2dContext, x: f32, y: f32, width: f32, height: f32, rounded: bool) {
    ctx.begin_path();
    if rounded {
        let radius = bar_corner_radius(width, height, rounded);
        ctx.round_rect(&RoundRectParams::uniform(x, y, width, height, radius));
    } else {
        ctx.rect(&RectParams {
            x,
            y,
            width,
            height,
        });
    }
}

fn draw_progress(ctx: &mut Canvas2dContext, config: &RankCardConfig) -> Result<()> {
    let bar = &config.progress_bar;

    ctx.set_fill_style(&bar.track_color)?;
    bar_path(ctx, bar.x, bar.y, bar.width, bar.height, bar.rounded);
    ctx.fill();

    let ratio = progress(config.current_xp.value, config.required_xp.value);
    let fill_width = bar.width * ratio as f32;

    if fill_width > 0.0 {
        match &bar.fill {
            BarFill::Solid(color) => ctx.set_fill_style(color)?,
            BarFill::Gradient(colors) => {
                // Gradient spans the full track, not just the filled part
                let mut gradient =
                    ctx.create_linear_gradient(bar.x, bar.y, bar.x + bar.width, bar.y);
                for (offset, color) in gradient_offsets(colors.len()).into_iter().zip(colors) {
                    gradient.add_color_stop(offset, color)?;
                }
                ctx.set_fill_style_gradient(gradient);
            }
        }
        bar_path(ctx, bar.x, bar.y, fill_width, bar.height, bar.rounded);
        ctx.fill();
    }

    let text_y = bar.y + bar.height + XP_TEXT_OFFSET_Y;
    ctx.set_font(&card_font("bold 16px"))?;

    ctx.set_text_align(TextAlign::Left);
    ctx.set_fill_style(&config.current_xp.color)?;
    ctx.fill_text(
        &xp_text(config.current_xp.value, config.required_xp.value),
        bar.x,
        text_y,
    );

    ctx.set_text_align(TextAlign::Right);
    ctx.fill_text(&percentage_text(ratio), bar.x + bar.width, text_y);
    Ok(())
}
