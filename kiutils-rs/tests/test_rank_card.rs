use image::{ImageFormat, Rgba, RgbaImage};
use kiutils_canvas2d::Canvas2dContext;
use kiutils_rs::rank_card::layout::{card_font, discriminator_x};
use kiutils_rs::rank_card::{
    AssetFailurePolicy, Background, RankCardConfig, RankCardOptions, RankCardRenderer,
    RenderPolicy,
};
use kiutils_rs::{FontConfig, ImageSource, KiutilsError};
use rstest::rstest;
use std::io::Cursor;
use std::ops::Range;

const BACKGROUND: [u8; 3] = [0x23, 0x27, 0x2A];
const TRACK: [u8; 3] = [0x48, 0x4b, 0x4e];
const ONLINE: [u8; 3] = [0x43, 0xb5, 0x81];
const BAR_MID_Y: u32 = 182;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renderer without any font faces so text never touches the sampled pixels.
fn renderer() -> RankCardRenderer {
    init_logging();
    RankCardRenderer::with_font_config(FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    })
}

/// Renderer with system fonts, or `None` when the host has no font faces.
fn font_renderer() -> Option<RankCardRenderer> {
    init_logging();
    if FontConfig::default().resolve().face_count() == 0 {
        eprintln!("no system fonts available, skipping");
        return None;
    }
    Some(RankCardRenderer::new())
}

fn options(json: &str) -> RankCardOptions {
    serde_json::from_str(json).unwrap()
}

fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn decode(png: &[u8]) -> RgbaImage {
    assert_eq!(image::guess_format(png).unwrap(), ImageFormat::Png);
    image::load_from_memory(png).unwrap().to_rgba8()
}

fn assert_rgb_near(img: &RgbaImage, x: u32, y: u32, expected: [u8; 3], tolerance: u8) {
    let actual = img.get_pixel(x, y).0;
    for i in 0..3 {
        assert!(
            actual[i].abs_diff(expected[i]) <= tolerance,
            "pixel ({x}, {y}) is {actual:?}, expected about {expected:?}"
        );
    }
    assert_eq!(actual[3], 255, "pixel ({x}, {y}) is not opaque");
}

#[tokio::test]
async fn test_empty_options_render_default_card() {
    let png = renderer().render(options("{}")).await.unwrap();
    let img = decode(&png);
    assert_eq!(img.dimensions(), (934, 282));

    // Rounded card corners stay transparent
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(933, 281).0[3], 0);

    // #23272A under a 30% #1E2124 overlay
    assert_rgb_near(&img, 10, 140, [34, 37, 40], 2);
}

#[rstest]
#[case(400, 150)]
#[case(1200, 400)]
#[tokio::test]
async fn test_output_matches_configured_size(#[case] width: u32, #[case] height: u32) {
    let json = format!(r#"{{"width": {width}, "height": {height}}}"#);
    let img = decode(&renderer().render(options(&json)).await.unwrap());
    assert_eq!(img.dimensions(), (width, height));
}

#[tokio::test]
async fn test_overlay_disabled_shows_plain_background() {
    let json = r#"{"overlay": {"display": false}}"#;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 10, 140, BACKGROUND, 0);
}

#[tokio::test]
async fn test_zero_overlay_level_uses_default_opacity() {
    let json = r#"{"overlay": {"level": 0}}"#;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 10, 140, [34, 37, 40], 2);
}

#[tokio::test]
async fn test_full_overlay_covers_background() {
    let json = r##"{"overlay": {"level": 1, "color": "#ff0000"}}"##;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 10, 140, [255, 0, 0], 0);
}

#[tokio::test]
async fn test_gradient_spans_full_track() {
    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 300},
        "requiredXP": {"data": 500},
        "progressBar": {"bar": {"type": "gradient", "color": ["#111111", "#eeeeee"]}}
    }"##;
    let img = decode(&renderer().render(options(json)).await.unwrap());

    // Stops sit at the track ends (275.5 and 872), not the fill end (~633)
    let expected_at = |x: f32| {
        let t = (x + 0.5 - 275.5) / 596.5;
        let v = (0x11 as f32 + (0xee - 0x11) as f32 * t).round() as u8;
        [v, v, v]
    };
    assert_rgb_near(&img, 300, BAR_MID_Y, expected_at(300.0), 4);
    assert_rgb_near(&img, 600, BAR_MID_Y, expected_at(600.0), 4);

    // Past 60% of the track only the track shows
    assert_rgb_near(&img, 700, BAR_MID_Y, TRACK, 0);
}

#[tokio::test]
async fn test_solid_fill_and_zero_progress() {
    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 50},
        "requiredXP": {"data": 100},
        "progressBar": {"bar": {"color": "#ff0000"}}
    }"##;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 400, BAR_MID_Y, [255, 0, 0], 0);
    assert_rgb_near(&img, 800, BAR_MID_Y, TRACK, 0);

    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 0},
        "progressBar": {"bar": {"color": "#ff0000"}}
    }"##;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 300, BAR_MID_Y, TRACK, 0);
}

#[tokio::test]
async fn test_progress_clamps_when_xp_exceeds_required() {
    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 900},
        "requiredXP": {"data": 100},
        "progressBar": {"bar": {"color": "#00ff00"}}
    }"##;
    let img = decode(&renderer().render(options(json)).await.unwrap());
    assert_rgb_near(&img, 860, BAR_MID_Y, [0, 255, 0], 0);
    // Nothing drawn past the track's right end
    assert_rgb_near(&img, 885, BAR_MID_Y, BACKGROUND, 0);
}

#[tokio::test]
async fn test_avatar_is_clipped_to_circle_with_status_badge() {
    let mut config = options(r#"{"overlay": {"display": false}}"#).resolve();
    config.avatar.source = Some(ImageSource::Bytes(solid_png(64, 64, [255, 0, 0])));

    let img = decode(&renderer().render_config(&config).await.unwrap());

    // Avatar box is (55, 41) 200x200, circle centered at (155, 141)
    assert_rgb_near(&img, 155, 141, [255, 0, 0], 2);
    assert_rgb_near(&img, 60, 46, BACKGROUND, 0);
    // Online badge centered at (235, 221)
    assert_rgb_near(&img, 235, 221, ONLINE, 0);
}

#[tokio::test]
async fn test_status_null_draws_online_badge() {
    let mut config = options(r#"{"overlay": {"display": false}, "status": {"type": null}}"#).resolve();
    config.avatar.source = Some(ImageSource::Bytes(solid_png(8, 8, [255, 0, 0])));

    let img = decode(&renderer().render_config(&config).await.unwrap());
    assert_rgb_near(&img, 155, 141, [255, 0, 0], 2);
    assert_rgb_near(&img, 235, 221, ONLINE, 0);
}

#[tokio::test]
async fn test_unset_status_draws_no_badge() {
    let mut config = options(r#"{"overlay": {"display": false}}"#).resolve();
    config.avatar.source = Some(ImageSource::Bytes(solid_png(8, 8, [255, 0, 0])));
    config.status = None;

    let img = decode(&renderer().render_config(&config).await.unwrap());
    assert_rgb_near(&img, 235, 221, BACKGROUND, 0);
}

#[rstest]
#[case(ImageSource::Bytes(b"definitely not an image".to_vec()))]
#[case(ImageSource::from("/nonexistent/kiutils/avatar.png"))]
#[tokio::test]
async fn test_broken_avatar_is_skipped(#[case] source: ImageSource) {
    let mut config = options(r#"{"overlay": {"display": false}}"#).resolve();
    config.avatar.source = Some(source);

    let img = decode(&renderer().render_config(&config).await.unwrap());
    assert_rgb_near(&img, 155, 141, BACKGROUND, 0);
    assert_rgb_near(&img, 235, 221, BACKGROUND, 0);
}

#[tokio::test]
async fn test_broken_avatar_fails_under_fail_policy() {
    let mut config = RankCardConfig::default();
    config.avatar.source = Some(ImageSource::Bytes(b"garbage".to_vec()));

    let renderer = renderer().with_policy(RenderPolicy {
        avatar: AssetFailurePolicy::Fail,
        ..RenderPolicy::default()
    });
    assert!(matches!(
        renderer.render_config(&config).await,
        Err(KiutilsError::ImageLoad(_))
    ));
}

#[tokio::test]
async fn test_missing_background_fails() {
    let json = r#"{"background": {"type": "image", "image": "/nonexistent/kiutils/bg.png"}}"#;
    assert!(matches!(
        renderer().render(options(json)).await,
        Err(KiutilsError::ImageLoad(_))
    ));
}

#[tokio::test]
async fn test_missing_background_skipped_uses_default_color() {
    let json = r#"{
        "overlay": {"display": false},
        "background": {"type": "image", "image": "/nonexistent/kiutils/bg.png"}
    }"#;
    let renderer = renderer().with_policy(RenderPolicy {
        background: AssetFailurePolicy::Skip,
        ..RenderPolicy::default()
    });
    let img = decode(&renderer.render(options(json)).await.unwrap());
    assert_rgb_near(&img, 10, 140, BACKGROUND, 0);
}

#[tokio::test]
async fn test_background_image_fills_card() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.png");
    std::fs::write(&path, solid_png(32, 16, [0, 0, 255])).unwrap();

    let mut config = options(r#"{"overlay": {"display": false}}"#).resolve();
    config.background = Background::Image(ImageSource::from(path));

    let img = decode(&renderer().render_config(&config).await.unwrap());
    assert_rgb_near(&img, 10, 140, [0, 0, 255], 2);
    assert_rgb_near(&img, 920, 270, [0, 0, 255], 2);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
}

#[tokio::test]
async fn test_unparsable_color_is_render_error() {
    let json = r#"{"background": {"type": "color", "image": "not-a-color"}}"#;
    assert!(matches!(
        renderer().render(options(json)).await,
        Err(KiutilsError::Render(_))
    ));
}

#[tokio::test]
async fn test_rendering_is_deterministic() {
    let json = r##"{
        "username": {"name": "kiutils"},
        "discriminator": {"discrim": 42},
        "currentXP": {"data": 300},
        "requiredXP": {"data": 500},
        "progressBar": {"bar": {"type": "gradient", "color": ["#111111", "#eeeeee"]}}
    }"##;
    let renderer = RankCardRenderer::new();
    let first = renderer.render(options(json)).await.unwrap();
    let second = renderer.render(options(json)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_renders_share_renderer() {
    let renderer = renderer();
    let (a, b) = tokio::join!(
        renderer.render(options("{}")),
        renderer.render(options(r#"{"width": 500}"#))
    );
    assert_eq!(decode(&a.unwrap()).dimensions(), (934, 282));
    assert_eq!(decode(&b.unwrap()).dimensions(), (500, 282));
}

fn is_ink(img: &RgbaImage, x: u32, y: u32) -> bool {
    let [r, g, b, _] = img.get_pixel(x, y).0;
    [r, g, b]
        .iter()
        .zip(BACKGROUND)
        .any(|(&actual, expected)| actual.abs_diff(expected) > 40)
}

/// Columns in `xs` holding at least one text pixel within rows `ys`.
fn inked_columns(img: &RgbaImage, xs: Range<u32>, ys: Range<u32>) -> Vec<u32> {
    xs.filter(|&x| ys.clone().any(|y| is_ink(img, x, y)))
        .collect()
}

const USERNAME_ROWS: Range<u32> = 70..106;
const STAT_ROWS: Range<u32> = 112..145;
const XP_ROWS: Range<u32> = 198..224;

#[tokio::test]
async fn test_username_drawn_at_anchor() {
    let Some(renderer) = font_renderer() else {
        return;
    };
    let json = r#"{
        "overlay": {"display": false},
        "username": {"name": "Name"},
        "discriminator": {"discrim": ""},
        "level": {"display": false},
        "rank": {"display": false}
    }"#;
    let img = decode(&renderer.render(options(json)).await.unwrap());

    let columns = inked_columns(&img, 260..934, USERNAME_ROWS);
    assert!(!columns.is_empty(), "username left no ink");
    assert!((275..=280).contains(&columns[0]), "username starts at {}", columns[0]);
    assert!(*columns.last().unwrap() < 400);

    // Hidden stats leave their row empty
    assert!(inked_columns(&img, 260..934, STAT_ROWS).is_empty());
}

#[rstest]
#[case(true, true)]
#[case(true, false)]
#[case(false, true)]
#[case(false, false)]
#[tokio::test]
async fn test_stat_row_follows_display_flags(#[case] level: bool, #[case] rank: bool) {
    let Some(renderer) = font_renderer() else {
        return;
    };
    let json = format!(
        r##"{{
            "overlay": {{"display": false}},
            "level": {{"display": {level}, "color": "#ffffff"}},
            "rank": {{"display": {rank}, "color": "#ffffff"}}
        }}"##
    );
    let img = decode(&renderer.render(options(&json)).await.unwrap());

    // Level label at x = 275 with its value at 345; rank label at 415, value at 480
    let level_columns = inked_columns(&img, 260..412, STAT_ROWS);
    let rank_columns = inked_columns(&img, 412..640, STAT_ROWS);
    assert_eq!(!level_columns.is_empty(), level);
    assert_eq!(!rank_columns.is_empty(), rank);
    if level {
        assert!((275..=280).contains(&level_columns[0]));
    }
    if rank {
        assert!((415..=420).contains(&rank_columns[0]));
    }
}

#[tokio::test]
async fn test_xp_text_spans_bar_width() {
    let Some(renderer) = font_renderer() else {
        return;
    };
    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 50, "color": "#ffffff"}
    }"##;
    let img = decode(&renderer.render(options(json)).await.unwrap());

    let columns = inked_columns(&img, 260..934, XP_ROWS);
    assert!(!columns.is_empty(), "XP text left no ink");
    // "XP: 50 / 100" starts at the bar's left edge
    assert!((275..=281).contains(&columns[0]), "XP text starts at {}", columns[0]);
    // "50%" ends at the bar's right edge, x = 872
    let last = *columns.last().unwrap();
    assert!((860..=873).contains(&last), "percentage ends at {last}");
}

#[tokio::test]
async fn test_percentage_uses_current_xp_color() {
    let Some(renderer) = font_renderer() else {
        return;
    };
    let json = r##"{
        "overlay": {"display": false},
        "currentXP": {"data": 50, "color": "#ff0000"},
        "requiredXP": {"data": 100, "color": "#00ff00"}
    }"##;
    let img = decode(&renderer.render(options(json)).await.unwrap());

    let mut red = 0;
    let mut green = 0;
    for x in 800..874 {
        for y in XP_ROWS {
            let [r, g, _, _] = img.get_pixel(x, y).0;
            if r > 150 && g < 80 {
                red += 1;
            }
            if g > 150 && r < 80 {
                green += 1;
            }
        }
    }
    assert!(red > 0, "percentage is not red");
    assert_eq!(green, 0, "percentage drawn in the requiredXP color");
}

#[tokio::test]
async fn test_discriminator_placed_after_small_font_username() {
    let Some(renderer) = font_renderer() else {
        return;
    };
    let name = "kiutils-username";
    let resolved = FontConfig::default().resolve();
    let mut ctx = Canvas2dContext::with_resolved(10, 10, &resolved).unwrap();
    ctx.set_font(&card_font("18px")).unwrap();
    let expected = discriminator_x(ctx.measure_text(name).width);

    // Transparent username so only the discriminator inks the row
    let json = format!(
        r##"{{
            "overlay": {{"display": false}},
            "username": {{"name": "{name}", "color": "#00000000"}},
            "discriminator": {{"discrim": "1234", "color": "#ffffff"}}
        }}"##
    );
    let img = decode(&renderer.render(options(&json)).await.unwrap());

    let columns = inked_columns(&img, 260..934, USERNAME_ROWS);
    assert!(!columns.is_empty(), "discriminator left no ink");
    let first = columns[0] as f32;
    assert!(
        first >= expected - 1.0 && first <= expected + 4.0,
        "discriminator starts at {first}, expected about {expected}"
    );
}
