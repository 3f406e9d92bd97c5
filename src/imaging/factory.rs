//! Backend selection.
//!
//! [`BackendKind`] names a backend in configuration; [`create_adapter`]
//! builds the matching [`Adapter`]. `Adapter` is a tagged enum that
//! implements [`ImageAdapter`] by delegating to the selected variant, so
//! callers hold one concrete type no matter which backend is active.

use super::adapter::{AdapterError, AdapterState, ImageAdapter};
use super::native_backend::{NativeAdapter, NativeOptions};
use super::params::{LoadOptions, MirrorMode, OverlayParams, Quality};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Backends that can be selected in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Pure-Rust `image` crate backend.
    #[default]
    Native,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
        }
    }
}

/// An adapter for whichever backend was configured.
#[derive(Debug)]
pub enum Adapter {
    Native(NativeAdapter),
}

/// Build a fresh, unloaded adapter for `kind`.
pub fn create_adapter(kind: BackendKind, native: NativeOptions) -> Adapter {
    match kind {
        BackendKind::Native => Adapter::Native(NativeAdapter::with_options(native)),
    }
}

impl Adapter {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Native(_) => BackendKind::Native,
        }
    }
}

/// Forward a chaining mutator to the active variant and hand back `self`.
macro_rules! delegate_mut {
    ($self:ident, $inner:ident => $call:expr) => {{
        match $self {
            Adapter::Native($inner) => {
                $call;
            }
        }
        $self
    }};
}

impl ImageAdapter for Adapter {
    fn state(&self) -> &AdapterState {
        match self {
            Self::Native(a) => a.state(),
        }
    }

    fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<&mut Self, AdapterError> {
        match self {
            Self::Native(a) => {
                a.load(path, options)?;
            }
        }
        Ok(self)
    }

    fn content_optimized_format(&self) -> &'static str {
        match self {
            Self::Native(a) => a.content_optimized_format(),
        }
    }

    fn save(
        &self,
        path: &Path,
        format: Option<&str>,
        quality: Option<Quality>,
    ) -> Result<&Self, AdapterError> {
        match self {
            Self::Native(a) => {
                a.save(path, format, quality)?;
            }
        }
        Ok(self)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<&mut Self, AdapterError> {
        match self {
            Self::Native(a) => {
                a.resize(width, height)?;
            }
        }
        Ok(self)
    }

    fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> &mut Self {
        delegate_mut!(self, a => a.crop(x, y, width, height))
    }

    fn frame(&mut self, width: u32, height: u32, force_resize: bool) -> &mut Self {
        delegate_mut!(self, a => a.frame(width, height, force_resize))
    }

    fn set_background_color(&mut self, color: &str) -> &mut Self {
        delegate_mut!(self, a => a.set_background_color(color))
    }

    fn set_background_image(&mut self, image: &Path, mode: Option<&str>) -> &mut Self {
        delegate_mut!(self, a => a.set_background_image(image, mode))
    }

    fn grayscale(&mut self) -> &mut Self {
        delegate_mut!(self, a => a.grayscale())
    }

    fn sepia(&mut self) -> &mut Self {
        delegate_mut!(self, a => a.sepia())
    }

    fn add_overlay(&mut self, overlay: &OverlayParams) -> &mut Self {
        delegate_mut!(self, a => a.add_overlay(overlay))
    }

    fn mirror(&mut self, mode: MirrorMode) -> &mut Self {
        delegate_mut!(self, a => a.mirror(mode))
    }

    fn rotate(&mut self, angle: i32) -> &mut Self {
        delegate_mut!(self, a => a.rotate(angle))
    }

    fn supports_format(&self, format: &str, force: bool) -> bool {
        match self {
            Self::Native(a) => a.supports_format(format, force),
        }
    }

    fn is_loaded(&self) -> bool {
        match self {
            Self::Native(a) => a.is_loaded(),
        }
    }
}
