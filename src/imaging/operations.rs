//! High-level rendition operations.
//!
//! These functions combine calculations with adapter calls. They take a
//! [`RenditionSpec`], compute target dimensions, and drive any
//! [`ImageAdapter`] through load → resize → save.

use super::adapter::{AdapterError, ImageAdapter};
use super::calculations::{complete_dimensions, fit_longer_edge};
use super::format::resolve_format;
use super::params::{Dimensions, LoadOptions, Quality};
use serde::Serialize;
use std::path::Path;

/// Result type for rendition operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Format tag that defers to the adapter's content-optimized choice.
pub const AUTO_FORMAT: &str = "auto";

/// What a rendition should look like.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenditionSpec {
    /// Exact output width. With `height` also set, scaling is non-uniform.
    pub width: Option<u32>,
    /// Exact output height.
    pub height: Option<u32>,
    /// Longer-edge bound, used when neither `width` nor `height` is set.
    pub max_edge: Option<u32>,
    /// Output format tag; `"auto"` picks the content-optimized format.
    pub format: Option<String>,
    pub quality: Option<Quality>,
}

/// Outcome of one rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenditionReport {
    pub source: Dimensions,
    pub output: Dimensions,
    /// Format tag actually written.
    pub format: String,
    pub resized: bool,
}

/// What `identify` reports about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub source_format: Option<String>,
    pub alpha_possible: bool,
    pub content_optimized_format: String,
}

/// Compute the output dimensions for `source` under `spec`.
pub fn plan_rendition(source: Dimensions, spec: &RenditionSpec) -> Dimensions {
    let src = (source.width, source.height);
    let target = if spec.width.is_some() || spec.height.is_some() {
        complete_dimensions(src, spec.width, spec.height)
    } else if let Some(max_edge) = spec.max_edge {
        fit_longer_edge(src, max_edge)
    } else {
        src
    };
    target.into()
}

/// Load `source`, resize per `spec` if needed, and save to `output`.
pub fn create_rendition(
    adapter: &mut impl ImageAdapter,
    source: &Path,
    output: &Path,
    spec: &RenditionSpec,
) -> Result<RenditionReport> {
    adapter.load(source, &LoadOptions::default())?;
    let format = output_format(&*adapter, spec)?;
    render_loaded(adapter, output, spec, format)
}

/// The format tag `spec` resolves to for the image currently loaded.
///
/// `"auto"` defers to the content-optimized format; everything else goes
/// through [`resolve_format`].
pub fn output_format(adapter: &impl ImageAdapter, spec: &RenditionSpec) -> Result<String> {
    let requested = match spec.format.as_deref() {
        Some(f) if f.eq_ignore_ascii_case(AUTO_FORMAT) => Some(adapter.content_optimized_format()),
        other => other,
    };
    resolve_format(requested, adapter.source_image_format())
}

/// File extension to use for a resolved format tag.
pub fn extension_for(format: &str) -> &str {
    match format {
        "pjpeg" => "jpg",
        other => other,
    }
}

/// Resize an already-loaded adapter per `spec` and save it as `format`.
pub fn render_loaded(
    adapter: &mut impl ImageAdapter,
    output: &Path,
    spec: &RenditionSpec,
    format: String,
) -> Result<RenditionReport> {
    let source_dims = adapter.state().dimensions();

    let target = plan_rendition(source_dims, spec);
    let resized = target != source_dims;
    if resized {
        adapter.resize(target.width, target.height)?;
    }

    adapter.save(output, Some(&format), spec.quality)?;

    Ok(RenditionReport {
        source: source_dims,
        output: adapter.state().dimensions(),
        format,
        resized,
    })
}

/// Load `path` and summarise it without writing anything.
pub fn describe(adapter: &mut impl ImageAdapter, path: &Path) -> Result<ImageSummary> {
    adapter.load(path, &LoadOptions::default())?;
    Ok(ImageSummary {
        width: adapter.width(),
        height: adapter.height(),
        source_format: adapter.source_image_format().map(str::to_string),
        alpha_possible: adapter.is_alpha_possible(),
        content_optimized_format: adapter.content_optimized_format().to_string(),
    })
}
