//! Image format conversion, resizing and thumbnails.

use crate::error::{KiutilsError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use log::{debug, info};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_QUALITY: u8 = 80;

/// Output formats understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Avif,
    Tiff,
    Gif,
    Heif,
}

impl OutputFormat {
    /// Format implied by a file extension, e.g. `out.JPG` is JPEG.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                KiutilsError::UnsupportedFormat(format!(
                    "cannot infer output format from {}",
                    path.display()
                ))
            })?;
        ext.parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Gif => "gif",
            OutputFormat::Heif => "heif",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = KiutilsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            "avif" => Ok(OutputFormat::Avif),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "gif" => Ok(OutputFormat::Gif),
            "heif" | "heic" => Ok(OutputFormat::Heif),
            other => Err(KiutilsError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How an image is fitted into a `width x height` box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fit {
    /// Fill the box, cropping the overflow around the center.
    Cover,
    /// Fit inside the box and pad the rest with opaque black.
    #[default]
    Contain,
    /// Stretch to the box, ignoring the aspect ratio.
    Fill,
    /// Fit inside the box, no padding.
    Inside,
    /// Cover the box, no cropping.
    Outside,
}

impl FromStr for Fit {
    type Err = KiutilsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cover" => Ok(Fit::Cover),
            "contain" => Ok(Fit::Contain),
            "fill" => Ok(Fit::Fill),
            "inside" => Ok(Fit::Inside),
            "outside" => Ok(Fit::Outside),
            other => Err(KiutilsError::InvalidArgument(format!("unknown fit: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    /// 1 to 100; used by JPEG. Defaults to 80.
    pub quality: Option<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
    /// Accepted for compatibility. Decoding drops EXIF and ICC data, so it
    /// is not carried over.
    pub with_metadata: bool,
}

/// Where the image to convert comes from.
#[derive(Debug, Clone, Copy)]
pub enum ImageInput<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for ImageInput<'a> {
    fn from(value: &'a Path) -> Self {
        ImageInput::Path(value)
    }
}

impl<'a> From<&'a PathBuf> for ImageInput<'a> {
    fn from(value: &'a PathBuf) -> Self {
        ImageInput::Path(value.as_path())
    }
}

impl<'a> From<&'a [u8]> for ImageInput<'a> {
    fn from(value: &'a [u8]) -> Self {
        ImageInput::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageInput<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        ImageInput::Bytes(value.as_slice())
    }
}

async fn read_input(input: ImageInput<'_>) -> Result<Vec<u8>> {
    match input {
        ImageInput::Path(path) => Ok(tokio::fs::read(path).await?),
        ImageInput::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

/// Convert an image to `format`, resizing when the options ask for it.
pub async fn convert_image<'a>(
    input: impl Into<ImageInput<'a>>,
    format: OutputFormat,
    options: &ConversionOptions,
) -> Result<Vec<u8>> {
    let bytes = read_input(input.into()).await?;
    convert_bytes(&bytes, format, options)
}

/// Convert `input_path` into the format implied by `output_path`'s extension
/// and write the result there. Returns `output_path`.
pub async fn convert_image_file(
    input_path: &Path,
    output_path: &Path,
    options: &ConversionOptions,
) -> Result<PathBuf> {
    let format = OutputFormat::from_path(output_path)?;
    let encoded = convert_image(input_path, format, options).await?;
    tokio::fs::write(output_path, &encoded).await?;
    info!(
        "Converted {} to {} ({} bytes)",
        input_path.display(),
        output_path.display(),
        encoded.len()
    );
    Ok(output_path.to_path_buf())
}

/// Shrink an image to fit inside `width x height` (or `width` wide when no
/// height is given), keeping the aspect ratio.
pub async fn create_thumbnail<'a>(
    input: impl Into<ImageInput<'a>>,
    width: u32,
    height: Option<u32>,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    if width == 0 {
        return Err(KiutilsError::InvalidArgument(
            "thumbnail width must be positive".to_string(),
        ));
    }
    let options = ConversionOptions {
        width: Some(width),
        height,
        fit: Fit::Inside,
        ..Default::default()
    };
    convert_image(input, format, &options).await
}

/// Synchronous core of [`convert_image`].
pub fn convert_bytes(
    bytes: &[u8],
    format: OutputFormat,
    options: &ConversionOptions,
) -> Result<Vec<u8>> {
    let quality = options.quality.unwrap_or(DEFAULT_QUALITY);
    if !(1..=100).contains(&quality) {
        return Err(KiutilsError::InvalidArgument(format!(
            "quality must be between 1 and 100, got {quality}"
        )));
    }
    if matches!(format, OutputFormat::Avif | OutputFormat::Heif) {
        return Err(KiutilsError::UnsupportedFormat(format!(
            "{format} encoding is not available"
        )));
    }
    if options.with_metadata {
        debug!("Image metadata is not preserved by the converter");
    }

    let img = image::load_from_memory(bytes)?;
    let img = resize(img, options);
    encode(&img, format, quality)
}

fn resize(img: DynamicImage, options: &ConversionOptions) -> DynamicImage {
    let (iw, ih) = img.dimensions();
    let filter = FilterType::Lanczos3;
    let scaled = |scale: f64| {
        (
            ((iw as f64 * scale).round() as u32).max(1),
            ((ih as f64 * scale).round() as u32).max(1),
        )
    };

    match (options.width, options.height) {
        (None, None) => img,
        (Some(w), None) if iw > w => {
            let (w, h) = scaled(w as f64 / iw as f64);
            img.resize_exact(w, h, filter)
        }
        (None, Some(h)) if ih > h => {
            let (w, h) = scaled(h as f64 / ih as f64);
            img.resize_exact(w, h, filter)
        }
        (Some(w), Some(h)) if iw > w || ih > h => match options.fit {
            Fit::Fill => img.resize_exact(w, h, filter),
            Fit::Inside => img.resize(w, h, filter),
            Fit::Cover => img.resize_to_fill(w, h, filter),
            Fit::Outside => {
                let scale = (w as f64 / iw as f64).max(h as f64 / ih as f64);
                let (w, h) = scaled(scale);
                img.resize_exact(w, h, filter)
            }
            Fit::Contain => {
                let inner = img.resize(w, h, filter).to_rgba8();
                let mut boxed = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]));
                let x = (w - inner.width()) / 2;
                let y = (h - inner.height()) / 2;
                image::imageops::overlay(&mut boxed, &inner, x as i64, y as i64);
                DynamicImage::ImageRgba8(boxed)
            }
        },
        // Already inside the requested box
        _ => img,
    }
}

fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Best,
                PngFilter::Adaptive,
            );
            img.write_with_encoder(encoder)?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
        }
        OutputFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?;
        }
        OutputFormat::Tiff => img.write_to(&mut buf, ImageFormat::Tiff)?,
        OutputFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buf, ImageFormat::Gif)?
        }
        OutputFormat::Avif | OutputFormat::Heif => {
            return Err(KiutilsError::UnsupportedFormat(format.to_string()))
        }
    }
    Ok(buf.into_inner())
}
