//! Image adapters: one loaded image, a uniform mutate-then-save lifecycle.
//!
//! | Operation | Native backend |
//! |---|---|
//! | **Load** | `image::ImageReader` (extension + content sniffing) |
//! | **Resize** | `resize_exact`, independent x/y scale |
//! | **Save** | encode to `<path>.<format>`, then rename onto `<path>` |
//! | **Crop, frame, rotate, …** | accepted, no-op |
//!
//! The module is split into:
//! - **Adapter**: [`ImageAdapter`] trait + shared [`AdapterState`] bookkeeping
//! - **Backends**: [`NativeAdapter`], selected through [`create_adapter`]
//! - **Format**: output tag resolution and encoder selection
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures passed to adapter operations
//! - **Operations**: Rendition pipeline generic over any adapter

pub mod adapter;
pub mod calculations;
pub mod factory;
pub mod format;
pub mod native_backend;
pub mod operations;
mod params;

pub use adapter::{AdapterError, AdapterState, ImageAdapter};
pub use factory::{Adapter, BackendKind, create_adapter};
pub use native_backend::{NativeAdapter, NativeOptions, supported_input_extensions};
pub use operations::{
    ImageSummary, RenditionReport, RenditionSpec, create_rendition, describe, extension_for,
    output_format, plan_rendition, render_loaded,
};
pub use params::{Dimensions, LoadOptions, MirrorMode, OverlayParams, Quality};
