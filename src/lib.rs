//! # Rendition
//!
//! A uniform load → mutate → save lifecycle over one decoded image, with the
//! pixel work delegated to a backend chosen at configuration time.
//!
//! ```text
//! adapter.load(path)  →  resize / crop / …  →  adapter.save(path, format, quality)
//! ```
//!
//! Every backend implements [`imaging::ImageAdapter`]. The trait keeps the
//! shared bookkeeping (dimensions, source format, alpha-possible, modified)
//! in one [`imaging::AdapterState`], so backends only supply the pixel
//! operations. The shipped backend, [`imaging::NativeAdapter`], is built on
//! the pure-Rust `image` crate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Adapter contract, native backend, format resolution, rendition pipeline |
//! | [`config`] | Layered `rendition.toml` loading, validation and adapter construction |
//! | [`batch`] | Directory-wide renditions on a rayon pool, one adapter per file |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Atomic Saves
//!
//! `save` never writes the destination directly. The encoder writes to
//! `<path>.<format>` and the finished file is renamed onto `<path>`, so a
//! reader never observes a half-written image. A failed encode or rename
//! removes the temporary file.
//!
//! ## Chaining
//!
//! Mutators return the adapter, so a full rendition reads as one expression:
//!
//! ```no_run
//! use rendition::imaging::{ImageAdapter, LoadOptions, NativeAdapter};
//! use std::path::Path;
//!
//! let mut adapter = NativeAdapter::new();
//! adapter
//!     .load(Path::new("in.png"), &LoadOptions::default())?
//!     .resize(320, 240)?
//!     .save(Path::new("out.jpg"), Some("jpg"), None)?;
//! # Ok::<(), rendition::imaging::AdapterError>(())
//! ```
//!
//! ## Declared, Not Implemented
//!
//! Crop, frame, background, grayscale, sepia, overlay, mirror and rotate are
//! part of the contract so callers can be written against any backend. The
//! native backend accepts them and leaves the image untouched.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
