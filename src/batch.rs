//! Directory-wide renditions.
//!
//! Walks an input directory, renders every supported image into the output
//! directory (mirroring the relative layout), and reports one outcome per
//! file. Each file gets its own adapter; adapters are never shared between
//! workers. Work is spread over a rayon pool sized by
//! [`effective_threads`](crate::config::effective_threads).
//!
//! A failing file is recorded in its [`BatchOutcome`] and does not stop the
//! rest of the batch. Sources whose outputs would land on the same path
//! (`a.jpg` and `a.jpeg` rendered as `a.png`) are not rendered twice: the
//! first in path order claims the output, the others fail with
//! [`FileError::OutputConflict`].
//!
//! Only problems with the batch itself (unreadable input directory, thread
//! pool setup) surface as [`BatchError`].

use crate::config::{AdapterConfig, effective_threads};
use crate::imaging::{
    AdapterError, ImageAdapter, LoadOptions, RenditionReport, RenditionSpec, extension_for,
    output_format, render_loaded, supported_input_extensions,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why one file in a batch produced no rendition.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("Output {} is already claimed by {}", output.display(), claimed_by.display())]
    OutputConflict { output: PathBuf, claimed_by: PathBuf },
}

/// Result of rendering one source file.
#[derive(Debug)]
pub struct BatchOutcome {
    pub source: PathBuf,
    /// Where the rendition was (or would have been) written. `None` when the
    /// file failed before its output format was known.
    pub output: Option<PathBuf>,
    pub result: Result<RenditionReport, FileError>,
}

/// All outcomes of a batch, in source path order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Whether `path` has an extension with a compiled-in decoder.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Every supported image below `input_dir`, sorted by path.
pub fn collect_sources(input_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(input_dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Output path for `source`: same relative location under `output_dir`,
/// extension swapped for `format`.
pub fn output_path_for(input_dir: &Path, source: &Path, output_dir: &Path, format: &str) -> PathBuf {
    let relative = source.strip_prefix(input_dir).unwrap_or(source);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from("image"),
    };
    output_dir
        .join(relative)
        .with_extension(extension_for(format))
}

/// Output path for `source` without an extension. Two sources with the
/// same stem can end up on the same file whatever format each resolves to.
fn output_stem(input_dir: &Path, source: &Path, output_dir: &Path) -> PathBuf {
    output_path_for(input_dir, source, output_dir, "")
}

/// Split `sources` (sorted) into those that own their output stem and
/// failed outcomes for the ones that collide with an earlier source.
fn claim_outputs<'a>(
    input_dir: &Path,
    output_dir: &Path,
    sources: &'a [PathBuf],
) -> (Vec<&'a Path>, Vec<BatchOutcome>) {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut owners = Vec::new();
    let mut conflicts = Vec::new();

    for source in sources {
        match claimed.entry(output_stem(input_dir, source, output_dir)) {
            Entry::Vacant(slot) => {
                slot.insert(source.as_path());
                owners.push(source.as_path());
            }
            Entry::Occupied(slot) => {
                warn!(
                    source = %source.display(),
                    claimed_by = %slot.get().display(),
                    "Output path already claimed"
                );
                conflicts.push(BatchOutcome {
                    source: source.clone(),
                    output: None,
                    result: Err(FileError::OutputConflict {
                        output: slot.key().clone(),
                        claimed_by: slot.get().to_path_buf(),
                    }),
                });
            }
        }
    }
    (owners, conflicts)
}

fn render_one(
    config: &AdapterConfig,
    input_dir: &Path,
    output_dir: &Path,
    source: &Path,
    spec: &RenditionSpec,
) -> BatchOutcome {
    let mut adapter = config.create_adapter();
    let mut output = None;

    let result = (|| -> Result<RenditionReport, AdapterError> {
        adapter.load(source, &LoadOptions::default())?;
        let format = output_format(&adapter, spec)?;
        let target = output_path_for(input_dir, source, output_dir, &format);
        output = Some(target.clone());

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AdapterError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        render_loaded(&mut adapter, &target, spec, format)
    })()
    .map_err(FileError::from);

    match &result {
        Ok(report) => info!(
            source = %source.display(),
            width = report.output.width,
            height = report.output.height,
            format = %report.format,
            "Rendered"
        ),
        Err(e) => warn!(source = %source.display(), error = %e, "Rendition failed"),
    }

    BatchOutcome {
        source: source.to_path_buf(),
        output,
        result,
    }
}

/// Render every supported image under `input_dir` into `output_dir`.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    spec: &RenditionSpec,
    config: &AdapterConfig,
) -> Result<BatchSummary, BatchError> {
    let sources = collect_sources(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let threads = effective_threads(&config.processing);
    info!(files = sources.len(), threads, "Starting batch");

    let (owners, conflicts) = claim_outputs(input_dir, output_dir, &sources);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    let mut outcomes: Vec<BatchOutcome> = pool.install(|| {
        owners
            .par_iter()
            .map(|source| render_one(config, input_dir, output_dir, source, spec))
            .collect()
    });
    outcomes.extend(conflicts);
    outcomes.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(BatchSummary { outcomes })
}
