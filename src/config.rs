//! Adapter configuration module.
//!
//! Handles loading, validating, and merging `rendition.toml` files.
//! Configuration is layered: stock defaults are overridden by a
//! `rendition.toml` in the working directory, which is in turn overridden by
//! a file passed with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [backend]
//! kind = "native"          # Image processing backend
//!
//! [resize]
//! filter = "lanczos3"      # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [output]
//! quality = 90             # Quality for lossy formats when none is requested (1-100)
//! avif_speed = 6           # AVIF encoder speed (1 = slowest/best, 10 = fastest)
//!
//! [processing]
//! max_processes = 4        # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [output]
//! quality = 80
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Adapter, BackendKind, NativeOptions, Quality, create_adapter};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name picked up from the working directory.
pub const CONFIG_FILENAME: &str = "rendition.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Adapter configuration loaded from `rendition.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Which backend the factory builds.
    pub backend: BackendConfig,
    /// Resampling settings.
    pub resize: ResizeConfig,
    /// Encoder settings.
    pub output: OutputConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl AdapterConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if !(1..=10).contains(&self.output.avif_speed) {
            return Err(ConfigError::Validation(
                "output.avif_speed must be 1-10".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Options handed to the native backend.
    pub fn native_options(&self) -> NativeOptions {
        NativeOptions {
            filter: self.resize.filter.into(),
            default_quality: Quality::new(self.output.quality),
            avif_speed: self.output.avif_speed,
        }
    }

    /// Build a fresh adapter for the configured backend.
    pub fn create_adapter(&self) -> Adapter {
        create_adapter(self.backend.kind, self.native_options())
    }
}

/// Backend selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub kind: BackendKind,
}

/// Resampling kernel names accepted in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterName {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<FilterName> for FilterType {
    fn from(name: FilterName) -> Self {
        match name {
            FilterName::Nearest => FilterType::Nearest,
            FilterName::Triangle => FilterType::Triangle,
            FilterName::CatmullRom => FilterType::CatmullRom,
            FilterName::Gaussian => FilterType::Gaussian,
            FilterName::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resampling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub filter: FilterName,
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Quality for JPEG/AVIF when `save` gets none (1 = worst, 100 = best).
    pub quality: u32,
    /// rav1e speed preset for AVIF output.
    pub avif_speed: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            avif_speed: 6,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AdapterConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<AdapterConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: AdapterConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the layered config: stock defaults, then `dir/rendition.toml`, then
/// `explicit` if given.
///
/// An explicit file that does not exist is an error; a missing
/// `rendition.toml` in `dir` is not.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<AdapterConfig, ConfigError> {
    let mut overlays = Vec::new();
    if let Some(value) = load_raw_config(&dir.join(CONFIG_FILENAME))? {
        overlays.push(value);
    }
    if let Some(file) = explicit {
        let value = load_raw_config(file)?.ok_or_else(|| {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", file.display()),
            ))
        })?;
        overlays.push(value);
    }
    resolve_config(stock_defaults_value()?, overlays)
}

/// Returns a fully-commented stock `rendition.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Rendition Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Files are layered, later ones overriding earlier ones:
#   built-in defaults
#   ./rendition.toml
#   --config <FILE>
#
# Each layer only needs the keys it wants to override.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Backend
# ---------------------------------------------------------------------------
[backend]
# Image processing backend. "native" delegates to the pure-Rust image crate.
kind = "native"

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# Resampling kernel: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# Quality for JPEG/AVIF when none is requested (1 = worst, 100 = best).
# Lossless formats (PNG, GIF, TIFF, WebP) ignore it.
quality = 90

# AVIF encoder speed (1 = slowest/smallest, 10 = fastest).
avif_speed = 6

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for `rendition batch`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
