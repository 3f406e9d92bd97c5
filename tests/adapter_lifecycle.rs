//! End-to-end checks of the public adapter API against real files.
//!
//! Fixtures are generated into temp directories, so nothing outside the
//! crate is needed.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use rendition::config::{AdapterConfig, load_config};
use rendition::imaging::{
    AdapterError, ImageAdapter, LoadOptions, NativeAdapter, Quality, RenditionSpec,
    create_rendition, describe,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 120])
    })
    .save_with_format(&path, ImageFormat::Jpeg)
    .unwrap();
    path
}

fn logo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(width, height, |x, _| {
        Rgba([200, 30, 30, if x % 2 == 0 { 0 } else { 255 }])
    })
    .save_with_format(&path, ImageFormat::Png)
    .unwrap();
    path
}

fn format_of(path: &Path) -> Option<ImageFormat> {
    image::ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .format()
}

#[test]
fn load_resize_save_chain() {
    let tmp = TempDir::new().unwrap();
    let source = photo(tmp.path(), "beach.jpg", 300, 200);
    let out = tmp.path().join("beach-small.webp");

    let mut adapter = NativeAdapter::new();
    adapter
        .load(&source, &LoadOptions::default())
        .unwrap()
        .resize(150, 50)
        .unwrap()
        .save(&out, Some("WEBP"), None)
        .unwrap();

    assert_eq!(image::image_dimensions(&out).unwrap(), (150, 50));
    assert_eq!(format_of(&out), Some(ImageFormat::WebP));
    assert!(adapter.is_modified());
    assert_eq!(adapter.source_image_format(), Some("jpg"));
}

#[test]
fn save_leaves_only_the_destination() {
    let tmp = TempDir::new().unwrap();
    let source = photo(tmp.path(), "a.jpg", 40, 40);
    let out_dir = tmp.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let mut adapter = NativeAdapter::new();
    adapter.load(&source, &LoadOptions::default()).unwrap();
    adapter.save(&out_dir.join("a.png"), None, None).unwrap();

    let names: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["a.png"]);
    assert_eq!(format_of(&out_dir.join("a.png")), Some(ImageFormat::Png));
}

#[test]
fn transparent_png_prefers_png() {
    let tmp = TempDir::new().unwrap();
    let source = logo(tmp.path(), "logo.png", 16, 16);

    let summary = describe(&mut NativeAdapter::new(), &source).unwrap();
    assert!(summary.alpha_possible);
    assert_eq!(summary.content_optimized_format, "png");
    assert_eq!(summary.source_format.as_deref(), Some("png"));
}

#[test]
fn photo_prefers_progressive_jpeg() {
    let tmp = TempDir::new().unwrap();
    let source = photo(tmp.path(), "p.JPG", 16, 16);

    let summary = describe(&mut NativeAdapter::new(), &source).unwrap();
    assert!(!summary.alpha_possible);
    assert_eq!(summary.content_optimized_format, "pjpeg");
    assert_eq!(summary.source_format.as_deref(), Some("jpg"));
}

#[test]
fn rendition_with_configured_adapter() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("rendition.toml"),
        "[resize]\nfilter = \"nearest\"\n\n[output]\nquality = 40\n",
    )
    .unwrap();
    let config = load_config(tmp.path(), None).unwrap();
    assert_eq!(config.output.quality, 40);

    let source = photo(tmp.path(), "wide.jpg", 800, 400);
    let out = tmp.path().join("wide-thumb.jpg");
    let spec = RenditionSpec {
        max_edge: Some(200),
        format: Some("auto".into()),
        ..RenditionSpec::default()
    };

    let mut adapter = config.create_adapter();
    let report = create_rendition(&mut adapter, &source, &out, &spec).unwrap();

    assert_eq!(report.format, "pjpeg");
    assert!(report.resized);
    assert_eq!(image::image_dimensions(&out).unwrap(), (200, 100));
    assert_eq!(format_of(&out), Some(ImageFormat::Jpeg));
}

#[test]
fn higher_quality_produces_larger_jpeg() {
    let tmp = TempDir::new().unwrap();
    let source = photo(tmp.path(), "q.jpg", 200, 200);
    let low = tmp.path().join("low.jpg");
    let high = tmp.path().join("high.jpg");

    let mut adapter = AdapterConfig::default().create_adapter();
    adapter.load(&source, &LoadOptions::default()).unwrap();
    adapter.save(&low, Some("jpg"), Some(Quality::new(5))).unwrap();
    adapter.save(&high, Some("jpg"), Some(Quality::new(100))).unwrap();

    let low_len = fs::metadata(&low).unwrap().len();
    let high_len = fs::metadata(&high).unwrap().len();
    assert!(low_len < high_len, "q5={low_len} q100={high_len}");
}

#[test]
fn missing_source_is_a_decode_error() {
    let tmp = TempDir::new().unwrap();
    let mut adapter = NativeAdapter::new();
    let err = adapter
        .load(&tmp.path().join("nope.jpg"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, AdapterError::Decode { .. }));
    assert!(!adapter.is_loaded());
}

#[test]
fn unsupported_format_is_rejected_without_output() {
    let tmp = TempDir::new().unwrap();
    let source = photo(tmp.path(), "x.jpg", 10, 10);
    let out = tmp.path().join("x.bmp");

    let mut adapter = NativeAdapter::new();
    adapter.load(&source, &LoadOptions::default()).unwrap();
    let err = adapter.save(&out, Some("bmp"), None).unwrap_err();

    assert!(matches!(err, AdapterError::UnsupportedFormat(ref f) if f == "bmp"));
    assert!(!out.exists());
    assert!(!tmp.path().join("x.bmp.bmp").exists());
}
