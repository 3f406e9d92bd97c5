//! The image adapter contract and its shared bookkeeping.
//!
//! [`ImageAdapter`] is the surface callers program against: load one image,
//! apply zero or more mutations, save. Every backend implements the full
//! operation set so rendition code never needs to know which one is active.
//! Backends that lack an operation implement it as a no-op returning `self`
//! rather than an error, so callers can always chain the whole set.
//!
//! [`AdapterState`] is the bookkeeping every backend shares: cached
//! dimensions, the recorded source format, the alpha-possible flag, the
//! modified flag, and the `pre_modify` / `post_modify` hooks that bracket a
//! mutation.
//!
//! ## Lifecycle
//!
//! ```text
//! Unloaded ──load──▶ Loaded ──resize/crop/…──▶ Loaded
//!                      │
//!                      └──save──▶ (file written, state unchanged)
//! ```

use super::params::{Dimensions, LoadOptions, MirrorMode, OverlayParams, Quality};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode {format} to {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        format: String,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Output format \"original\" requested but no source format was recorded")]
    UnknownSourceFormat,
    #[error("Invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("No image loaded")]
    NotLoaded,
}

/// Bookkeeping shared by every adapter backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterState {
    path: Option<PathBuf>,
    width: u32,
    height: u32,
    source_image_format: Option<String>,
    is_alpha_possible: bool,
    modified: bool,
}

impl AdapterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    pub fn source_image_format(&self) -> Option<&str> {
        self.source_image_format.as_deref()
    }

    /// Record the source format. Lower-cased so `"original"` saves resolve
    /// to a tag the encoders recognise.
    pub fn set_source_image_format(&mut self, format: impl Into<String>) {
        self.source_image_format = Some(format.into().to_lowercase());
    }

    pub fn is_alpha_possible(&self) -> bool {
        self.is_alpha_possible
    }

    pub fn set_is_alpha_possible(&mut self, possible: bool) {
        self.is_alpha_possible = possible;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Hook run before a mutation touches the handle.
    pub fn pre_modify(&self, operation: &'static str) {
        trace!(
            operation,
            width = self.width,
            height = self.height,
            modified = self.modified,
            "Modifying image"
        );
    }

    /// Hook run after a mutation replaced the handle: re-syncs the cached
    /// dimensions and marks the image dirty.
    pub fn post_modify(&mut self, dims: Dimensions) {
        self.set_width(dims.width);
        self.set_height(dims.height);
        self.set_modified(true);
    }
}

/// Backend-agnostic facade over one loaded image.
///
/// Mutators return `&mut Self` so calls chain:
///
/// ```no_run
/// # use rendition::imaging::{ImageAdapter, LoadOptions, NativeAdapter, Quality};
/// # use std::path::Path;
/// # fn main() -> Result<(), rendition::imaging::AdapterError> {
/// let mut adapter = NativeAdapter::new();
/// adapter
///     .load(Path::new("photo.jpg"), &LoadOptions::default())?
///     .resize(800, 600)?
///     .save(Path::new("photo-800.jpg"), Some("original"), Some(Quality::new(85)))?;
/// # Ok(())
/// # }
/// ```
pub trait ImageAdapter {
    /// Shared bookkeeping for this adapter.
    fn state(&self) -> &AdapterState;

    /// Decode `path` into the handle, replacing any previous one.
    fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<&mut Self, AdapterError>;

    /// `"png"` when the loaded image can and does carry alpha, `"pjpeg"` otherwise.
    fn content_optimized_format(&self) -> &'static str;

    /// Encode the handle to `path`. See [`resolve_format`](super::format::resolve_format)
    /// for how `format` is interpreted.
    fn save(
        &self,
        path: &Path,
        format: Option<&str>,
        quality: Option<Quality>,
    ) -> Result<&Self, AdapterError>;

    /// Resample to exactly `width` x `height`, scaling each axis independently.
    fn resize(&mut self, width: u32, height: u32) -> Result<&mut Self, AdapterError>;

    fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> &mut Self;

    fn frame(&mut self, width: u32, height: u32, force_resize: bool) -> &mut Self;

    fn set_background_color(&mut self, color: &str) -> &mut Self;

    fn set_background_image(&mut self, image: &Path, mode: Option<&str>) -> &mut Self;

    fn grayscale(&mut self) -> &mut Self;

    fn sepia(&mut self) -> &mut Self;

    fn add_overlay(&mut self, overlay: &OverlayParams) -> &mut Self;

    fn mirror(&mut self, mode: MirrorMode) -> &mut Self;

    fn rotate(&mut self, angle: i32) -> &mut Self;

    fn supports_format(&self, format: &str, force: bool) -> bool;

    fn is_loaded(&self) -> bool;

    fn width(&self) -> u32 {
        self.state().width()
    }

    fn height(&self) -> u32 {
        self.state().height()
    }

    fn source_image_format(&self) -> Option<&str> {
        self.state().source_image_format()
    }

    fn is_alpha_possible(&self) -> bool {
        self.state().is_alpha_possible()
    }

    fn is_modified(&self) -> bool {
        self.state().is_modified()
    }
}
