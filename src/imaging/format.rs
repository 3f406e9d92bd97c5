//! Output format tags and their mapping onto encoders.
//!
//! Callers talk in lower-case string tags (`"png"`, `"jpg"`, `"pjpeg"`,
//! `"original"`, ...). [`resolve_format`] turns a requested tag into the
//! concrete tag to write, and [`EncodeTarget::from_tag`] picks the encoder.
//!
//! | Tag | Encoder | Quality honoured |
//! |---|---|---|
//! | `jpg`, `jpeg`, `pjpeg` | JPEG (baseline) | yes |
//! | `png`, `png32` | PNG | no |
//! | `gif` | GIF | no |
//! | `tif`, `tiff` | TIFF | no |
//! | `webp` | WebP (lossless) | no |
//! | `avif` | AVIF (rav1e) | yes |

use super::adapter::AdapterError;
use image::ImageFormat;
use tracing::debug;

/// Content-optimized format for photographic images without alpha.
pub const CONTENT_FORMAT_DEFAULT: &str = "pjpeg";

/// Content-optimized format for images that carry an alpha channel.
pub const CONTENT_FORMAT_ALPHA: &str = "png";

/// Sentinel tag meaning "whatever format the image was loaded from".
pub const ORIGINAL: &str = "original";

/// Source extensions whose container can carry an alpha channel.
const ALPHA_CAPABLE: &[&str] = &["png", "gif"];

/// Whether a source extension belongs to an alpha-capable format class.
pub fn is_alpha_capable(extension: &str) -> bool {
    ALPHA_CAPABLE
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Resolve the tag to write from the caller's request.
///
/// - lower-cases the request
/// - absent, empty and `"png32"` become `"png"`
/// - `"original"` becomes `source` (the format recorded at load time)
pub fn resolve_format(
    requested: Option<&str>,
    source: Option<&str>,
) -> Result<String, AdapterError> {
    let format = requested.unwrap_or_default().trim().to_lowercase();

    let resolved = match format.as_str() {
        "" | "png32" => "png".to_string(),
        ORIGINAL => source
            .map(str::to_lowercase)
            .ok_or(AdapterError::UnknownSourceFormat)?,
        _ => format,
    };

    debug!(requested = ?requested, source = ?source, resolved = %resolved, "Resolved output format");
    Ok(resolved)
}

/// Concrete encoder selected for a format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeTarget {
    Jpeg,
    Png,
    Gif,
    Tiff,
    WebP,
    Avif,
}

impl EncodeTarget {
    /// Map a resolved tag onto an encoder.
    pub fn from_tag(tag: &str) -> Result<Self, AdapterError> {
        match tag {
            "jpg" | "jpeg" | "pjpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "tif" | "tiff" => Ok(Self::Tiff),
            "webp" => Ok(Self::WebP),
            "avif" => Ok(Self::Avif),
            other => Err(AdapterError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Lossy encoders take a quality parameter; the rest ignore it.
    pub fn honours_quality(self) -> bool {
        matches!(self, Self::Jpeg | Self::Avif)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
            Self::WebP => ImageFormat::WebP,
            Self::Avif => ImageFormat::Avif,
        }
    }

    /// Whether the encoder can store an alpha channel.
    pub fn keeps_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}
