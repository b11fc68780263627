use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};
use kiutils_rs::convert::{
    convert_image, convert_image_file, create_thumbnail, ConversionOptions, Fit, OutputFormat,
};
use kiutils_rs::KiutilsError;
use rstest::rstest;
use std::path::PathBuf;
use tempfile::TempDir;

/// A `width x height` PNG on disk, half red and half blue.
fn write_source(dir: &TempDir, width: u32, height: u32) -> PathBuf {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    let path = dir.path().join("source.png");
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

#[rstest]
#[case("out.jpg", ImageFormat::Jpeg)]
#[case("out.JPEG", ImageFormat::Jpeg)]
#[case("out.webp", ImageFormat::WebP)]
#[case("out.tiff", ImageFormat::Tiff)]
#[case("out.gif", ImageFormat::Gif)]
#[case("out.png", ImageFormat::Png)]
#[tokio::test]
async fn test_convert_file_by_extension(#[case] name: &str, #[case] expected: ImageFormat) {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, 64, 32);
    let output = dir.path().join(name);

    let written = convert_image_file(&input, &output, &ConversionOptions::default())
        .await
        .unwrap();
    assert_eq!(written, output);

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), expected);
    assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (64, 32));
}

#[tokio::test]
async fn test_convert_file_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, 8, 8);
    let output = dir.path().join("out.xyz");

    let result = convert_image_file(&input, &output, &ConversionOptions::default()).await;
    assert!(matches!(result, Err(KiutilsError::UnsupportedFormat(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_convert_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = convert_image(
        &dir.path().join("missing.png"),
        OutputFormat::Png,
        &ConversionOptions::default(),
    )
    .await;
    assert!(matches!(result, Err(KiutilsError::Io(_))));
}

#[tokio::test]
async fn test_webp_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, 40, 20);
    let bytes = convert_image(&input, OutputFormat::Webp, &ConversionOptions::default())
        .await
        .unwrap();

    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(39, 19).0, [0, 0, 255, 255]);
}

#[tokio::test]
async fn test_jpeg_quality_changes_size() {
    let dir = tempfile::tempdir().unwrap();
    // Noisy content so quality matters
    let img = RgbaImage::from_fn(128, 128, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8, 255])
    });
    let input = dir.path().join("noise.png");
    img.save_with_format(&input, ImageFormat::Png).unwrap();

    let encode = |quality| {
        let input = input.clone();
        async move {
            let options = ConversionOptions {
                quality: Some(quality),
                ..Default::default()
            };
            convert_image(&input, OutputFormat::Jpeg, &options).await.unwrap()
        }
    };
    let low = encode(10).await;
    let high = encode(95).await;
    assert!(low.len() < high.len());
}

#[tokio::test]
async fn test_convert_bytes_with_resize() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = std::fs::read(write_source(&dir, 200, 100)).unwrap();
    let options = ConversionOptions {
        width: Some(50),
        height: Some(50),
        fit: Fit::Cover,
        ..Default::default()
    };
    let out = convert_image(&bytes, OutputFormat::Png, &options).await.unwrap();
    assert_eq!(image::load_from_memory(&out).unwrap().dimensions(), (50, 50));
}

#[rstest]
#[case(100, None, (100, 50))]
#[case(100, Some(20), (40, 20))]
#[case(1000, None, (200, 100))]
#[tokio::test]
async fn test_thumbnail_fits_inside(
    #[case] width: u32,
    #[case] height: Option<u32>,
    #[case] expected: (u32, u32),
) {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, 200, 100);
    let out = create_thumbnail(&input, width, height, OutputFormat::Png)
        .await
        .unwrap();
    assert_eq!(image::load_from_memory(&out).unwrap().dimensions(), expected);
}

#[tokio::test]
async fn test_thumbnail_zero_width() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, 20, 10);
    assert!(matches!(
        create_thumbnail(&input, 0, None, OutputFormat::Png).await,
        Err(KiutilsError::InvalidArgument(_))
    ));
}
