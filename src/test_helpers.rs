//! Shared test utilities: synthetic image fixtures written to temp directories.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let photo = write_jpeg(&tmp.path().join("album/photo.jpg"), 400, 300);
//! assert_eq!(sniff_format(&photo), Some(image::ImageFormat::Jpeg));
//! ```

use image::{ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Write a gradient JPEG, creating parent directories. Returns the path.
pub fn write_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    })
    .save_with_format(path, ImageFormat::Jpeg)
    .unwrap();
    path.to_path_buf()
}

/// Write an RGBA PNG whose left half is fully transparent. Returns the path.
pub fn write_alpha_png(path: &Path, width: u32, height: u32) -> PathBuf {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_fn(width, height, |x, y| {
        let a = if x < width / 2 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, a])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
    path.to_path_buf()
}

/// Container format detected from the file's bytes, ignoring its extension.
pub fn sniff_format(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .format()
}

/// File names directly inside `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
