//! Error types for kiutils-rs.

use crate::image_loading::ImageLoadError;
use kiutils_canvas2d::Canvas2dError;
use thiserror::Error;

/// Errors produced by the kiutils helpers.
#[derive(Debug, Error)]
pub enum KiutilsError {
    /// The drawing surface failed: creation, a drawing call, or PNG encoding.
    #[error("Render error: {0}")]
    Render(#[from] Canvas2dError),

    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, KiutilsError>;
