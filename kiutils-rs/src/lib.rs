#![allow(clippy::uninlined_format_args)]
#![doc = include_str!("../README.md")]

pub mod canvas;
pub mod convert;
pub mod error;
pub mod image_loading;
pub mod random;
pub mod rank_card;
pub mod sourcebin;
pub mod utils;
pub mod waifu;

#[macro_use]
extern crate lazy_static;

pub use error::{KiutilsError, Result};
pub use image_loading::{ImageLoadError, ImageLoader, ImageSource, LoadedImage};
pub use kiutils_canvas2d::FontConfig;
pub use rank_card::{RankCardOptions, RankCardRenderer};
pub use serde_json;

static KIUTILS_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    /// Client shared by every HTTP helper in the crate.
    pub(crate) static ref REQWEST_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .user_agent(KIUTILS_USER_AGENT)
        .build()
        .expect("Failed to construct reqwest client");
}
