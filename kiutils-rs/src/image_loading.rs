//! Loading images from paths, URLs and byte buffers into drawable pixmaps.

use crate::REQWEST_CLIENT;
use kiutils_canvas2d::CanvasPixmapRef;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Image source is empty")]
    EmptySource,

    #[error("Failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch image {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Image request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Decoded image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Where an image comes from.
///
/// Strings beginning with `http://` or `https://` are URLs; every other
/// string is a filesystem path.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
    Bytes(Vec<u8>),
}

impl ImageSource {
    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::Path(path) => path.as_os_str().is_empty(),
            ImageSource::Url(url) => url.is_empty(),
            ImageSource::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageSource::Url(value.to_string())
        } else {
            ImageSource::Path(PathBuf::from(value))
        }
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        ImageSource::from(value.as_str())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        ImageSource::Path(value)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(value: Vec<u8>) -> Self {
        ImageSource::Bytes(value)
    }
}

/// A decoded image, stored as premultiplied RGBA.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pixmap: tiny_skia::Pixmap,
}

impl LoadedImage {
    /// Decode encoded image bytes. The format is guessed from the content.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = (img.width(), img.height());

        let mut data = img.to_rgba8().into_raw();
        premultiply_alpha(&mut data);

        let pixmap = tiny_skia::IntSize::from_wh(width, height)
            .and_then(|size| tiny_skia::Pixmap::from_vec(data, size))
            .ok_or(ImageLoadError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Borrow the pixels in the form the drawing surface accepts.
    pub fn as_pixmap_ref(&self) -> CanvasPixmapRef<'_> {
        CanvasPixmapRef::from(&self.pixmap)
    }
}

fn premultiply_alpha(data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(4) {
        let a = chunk[3] as u16;
        if a < 255 {
            for c in &mut chunk[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }
}

/// Resolves [`ImageSource`]s to [`LoadedImage`]s.
///
/// Requests are made once; failures are reported, never retried.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: Client,
    timeout: Option<Duration>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self {
            client: REQWEST_CLIENT.clone(),
            timeout: None,
        }
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit each HTTP request to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load and decode an image.
    pub async fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImageLoadError> {
        if source.is_empty() {
            return Err(ImageLoadError::EmptySource);
        }
        let bytes = match source {
            ImageSource::Path(path) => {
                debug!("Reading image from {}", path.display());
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ImageLoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            ImageSource::Url(url) => self.fetch(url).await?,
            ImageSource::Bytes(bytes) => return LoadedImage::decode(bytes),
        };
        LoadedImage::decode(&bytes)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let http_err = |source| ImageLoadError::Http {
            url: url.to_string(),
            source,
        };

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(http_err)?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await.map_err(http_err)?;
                info!("Fetched image {url} ({} bytes)", bytes.len());
                Ok(bytes.to_vec())
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|err| format!("<body unavailable: {err}>"));
                error!("Failed to load image from url {url} with status {status:?}: {body}");
                Err(ImageLoadError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                })
            }
        }
    }
}
