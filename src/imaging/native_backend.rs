//! Native backend: every pixel operation is delegated to the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Resize | `image::DynamicImage::resize_exact` (non-uniform) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e) with speed + quality |
//! | Encode → PNG, GIF, TIFF, WebP | `image::DynamicImage::write_to` |
//!
//! Crop, frame, background, grayscale, sepia, overlay, mirror and rotate are
//! not implemented by this backend. They are accepted and leave the image
//! untouched.

use super::adapter::{AdapterError, AdapterState, ImageAdapter};
use super::calculations::scale_factors;
use super::format::{
    CONTENT_FORMAT_ALPHA, CONTENT_FORMAT_DEFAULT, EncodeTarget, is_alpha_capable, resolve_format,
};
use super::params::{Dimensions, LoadOptions, MirrorMode, OverlayParams, Quality};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Tunables for the native backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeOptions {
    /// Resampling kernel used by `resize`.
    pub filter: FilterType,
    /// Quality used when `save` is called without one.
    pub default_quality: Quality,
    /// rav1e speed preset for AVIF output (1 = slowest, 10 = fastest).
    pub avif_speed: u8,
}

impl Default for NativeOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            default_quality: Quality::default(),
            avif_speed: 6,
        }
    }
}

/// Adapter backed by the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Default)]
pub struct NativeAdapter {
    state: AdapterState,
    resource: Option<DynamicImage>,
    options: NativeOptions,
}

impl NativeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NativeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Record a source format before `load`; `load` will keep it.
    pub fn set_source_image_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.state.set_source_image_format(format);
        self
    }

    fn has_alpha_channel(&self) -> bool {
        self.state.is_alpha_possible()
            && self
                .resource
                .as_ref()
                .is_some_and(|img| img.color().has_alpha())
    }
}

/// Load and decode an image from disk, sniffing the container from its bytes.
fn load_image(path: &Path) -> Result<(DynamicImage, Option<ImageFormat>), AdapterError> {
    let decode_err = |source: ImageError| AdapterError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?;
    let format = reader.format();
    let img = reader.decode().map_err(decode_err)?;
    Ok((img, format))
}

/// `<path>.<tag>`, next to the destination so the final rename stays on one filesystem.
fn temp_path_for(path: &Path, tag: &str) -> PathBuf {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".");
    temp.push(tag);
    PathBuf::from(temp)
}

/// Remove a temporary file left by a failed save.
fn discard_temp(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed temporary file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temporary file"),
    }
}

/// Convert pixels into a layout the target encoder accepts.
fn prepare_pixels(img: &DynamicImage, target: EncodeTarget) -> Cow<'_, DynamicImage> {
    if target == EncodeTarget::Png {
        return Cow::Borrowed(img);
    }
    if img.color().has_alpha() && target.keeps_alpha() {
        match img {
            DynamicImage::ImageRgba8(_) => Cow::Borrowed(img),
            _ => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
        }
    } else {
        match img {
            DynamicImage::ImageRgb8(_) => Cow::Borrowed(img),
            _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        }
    }
}

/// Encode `img` into a fresh file at `path`.
fn encode_to(
    img: &DynamicImage,
    path: &Path,
    target: EncodeTarget,
    tag: &str,
    quality: Quality,
    avif_speed: u8,
) -> Result<(), AdapterError> {
    let io_err = |source: std::io::Error| AdapterError::Io {
        path: path.to_path_buf(),
        source,
    };
    let encode_err = |source: ImageError| AdapterError::Encode {
        path: path.to_path_buf(),
        format: tag.to_string(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let pixels = prepare_pixels(img, target);

    let encoded = match target {
        EncodeTarget::Jpeg => pixels
            .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality.as_u8())),
        EncodeTarget::Avif => pixels.write_with_encoder(AvifEncoder::new_with_speed_quality(
            &mut writer,
            avif_speed,
            quality.as_u8(),
        )),
        lossless => pixels.write_to(&mut writer, lossless.image_format()),
    };
    encoded.map_err(encode_err)?;

    writer.flush().map_err(io_err)
}

impl ImageAdapter for NativeAdapter {
    fn state(&self) -> &AdapterState {
        &self.state
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<&mut Self, AdapterError> {
        let (img, detected) = load_image(path)?;

        self.state.set_path(path);
        self.state.set_width(img.width());
        self.state.set_height(img.height());

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        if self.state.source_image_format().is_none() {
            let format = options
                .source_format
                .clone()
                .or_else(|| extension.clone())
                .or_else(|| {
                    detected.and_then(|f| f.extensions_str().first().map(|e| e.to_string()))
                });
            if let Some(format) = format {
                self.state.set_source_image_format(format);
            }
        }

        self.state
            .set_is_alpha_possible(extension.as_deref().is_some_and(is_alpha_capable));
        self.state.set_modified(false);
        self.resource = Some(img);

        info!(
            width = self.state.width(),
            height = self.state.height(),
            source_format = ?self.state.source_image_format(),
            "Image loaded"
        );
        Ok(self)
    }

    fn content_optimized_format(&self) -> &'static str {
        if self.has_alpha_channel() {
            CONTENT_FORMAT_ALPHA
        } else {
            CONTENT_FORMAT_DEFAULT
        }
    }

    #[instrument(skip_all, fields(path = %path.display(), format = ?format))]
    fn save(
        &self,
        path: &Path,
        format: Option<&str>,
        quality: Option<Quality>,
    ) -> Result<&Self, AdapterError> {
        let img = self.resource.as_ref().ok_or(AdapterError::NotLoaded)?;
        let tag = resolve_format(format, self.state.source_image_format())?;
        let target = EncodeTarget::from_tag(&tag)?;
        let quality = quality.unwrap_or(self.options.default_quality);
        let temp_path = temp_path_for(path, &tag);

        if let Err(e) = encode_to(img, &temp_path, target, &tag, quality, self.options.avif_speed) {
            discard_temp(&temp_path);
            return Err(e);
        }

        if let Err(source) = std::fs::rename(&temp_path, path) {
            discard_temp(&temp_path);
            return Err(AdapterError::Rename {
                from: temp_path,
                to: path.to_path_buf(),
                source,
            });
        }

        info!(
            format = %tag,
            quality = ?target.honours_quality().then_some(quality.value()),
            "Image saved"
        );
        Ok(self)
    }

    #[instrument(skip(self))]
    fn resize(&mut self, width: u32, height: u32) -> Result<&mut Self, AdapterError> {
        if width == 0 || height == 0 {
            return Err(AdapterError::InvalidDimensions { width, height });
        }
        let Some(current) = self.resource.take() else {
            return Err(AdapterError::NotLoaded);
        };

        self.state.pre_modify("resize");

        let (scale_x, scale_y) = scale_factors((current.width(), current.height()), (width, height));
        debug!(scale_x, scale_y, filter = ?self.options.filter, "Resampling");

        let resized = current.resize_exact(width, height, self.options.filter);
        self.state.post_modify(Dimensions {
            width: resized.width(),
            height: resized.height(),
        });
        self.resource = Some(resized);

        Ok(self)
    }

    // Not implemented by this backend: accepted, image left untouched.

    fn crop(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) -> &mut Self {
        self
    }

    fn frame(&mut self, _width: u32, _height: u32, _force_resize: bool) -> &mut Self {
        self
    }

    fn set_background_color(&mut self, _color: &str) -> &mut Self {
        self
    }

    fn set_background_image(&mut self, _image: &Path, _mode: Option<&str>) -> &mut Self {
        self
    }

    fn grayscale(&mut self) -> &mut Self {
        self
    }

    fn sepia(&mut self) -> &mut Self {
        self
    }

    fn add_overlay(&mut self, _overlay: &OverlayParams) -> &mut Self {
        self
    }

    fn mirror(&mut self, _mode: MirrorMode) -> &mut Self {
        self
    }

    fn rotate(&mut self, _angle: i32) -> &mut Self {
        self
    }

    fn supports_format(&self, _format: &str, _force: bool) -> bool {
        true
    }

    fn is_loaded(&self) -> bool {
        self.resource.is_some()
    }
}
