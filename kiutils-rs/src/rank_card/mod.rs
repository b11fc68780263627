//! Discord style rank cards.
//!
//! Options are resolved onto defaults by [`RankCardOptions::resolve`], then
//! drawn by [`RankCardRenderer`] in a fixed order: rounded card clip,
//! background, overlay, avatar with status badge, labels, progress bar.

pub mod layout;
mod options;
mod render;

pub use options::*;
pub use render::{AssetFailurePolicy, RankCardRenderer, RenderPolicy};
