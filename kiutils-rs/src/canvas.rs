//! A plain holder for basic canvas settings.

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasBackground {
    /// `"color"` for a flat fill, otherwise an image source.
    pub image: String,
    pub color: String,
}

impl Default for CanvasBackground {
    fn default() -> Self {
        Self {
            image: "color".to_string(),
            color: "#23272A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasData {
    pub width: u32,
    pub height: u32,
    pub background: CanvasBackground,
    pub font_color: String,
}

impl Default for CanvasData {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            background: CanvasBackground::default(),
            font_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    pub data: CanvasData,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored data and log it.
    pub fn print(&mut self, data: CanvasData) {
        self.data = data;
        info!("{:?}", self.data);
    }
}
