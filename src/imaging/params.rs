//! Parameter types for adapter operations.
//!
//! These structs describe *what* a caller asks for, not *how* a backend does
//! it. They are shared by every [`ImageAdapter`](super::adapter::ImageAdapter)
//! implementation so the calling code stays backend-agnostic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1-100, default 90). Clamped on construction.
//! - [`Dimensions`]: Pixel width and height of a loaded image.
//! - [`LoadOptions`]: Optional hints passed to `load`.
//! - [`OverlayParams`]: Placement and blending of an overlay image.
//! - [`MirrorMode`]: Axis for `mirror`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `u8` the `image` encoders take.
    pub(crate) fn as_u8(self) -> u8 {
        self.0 as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Hints for [`ImageAdapter::load`](super::adapter::ImageAdapter::load).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Source format to record when the adapter has none yet. Takes
    /// precedence over the file extension.
    pub source_format: Option<String>,
}

impl LoadOptions {
    pub fn with_source_format(format: impl Into<String>) -> Self {
        Self {
            source_format: Some(format.into()),
        }
    }
}

/// Where an overlay goes and how it blends.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayParams {
    pub image: PathBuf,
    pub x: i32,
    pub y: i32,
    /// Opacity in percent (0-100).
    pub alpha: u8,
    pub composite: String,
    pub origin: String,
}

impl OverlayParams {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            x: 0,
            y: 0,
            alpha: 100,
            composite: "over".to_string(),
            origin: "top-left".to_string(),
        }
    }
}

/// Axis for a mirror operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorMode {
    Horizontal,
    Vertical,
}
