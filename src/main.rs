use clap::{Parser, Subcommand};
use rendition::imaging::{Quality, RenditionSpec, create_rendition, describe};
use rendition::{batch, config, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rendition")]
#[command(about = "Load, resize and re-encode images through a pluggable adapter")]
#[command(long_about = "\
Load, resize and re-encode images through a pluggable adapter

Format tags:
  jpg, jpeg, pjpeg     JPEG (quality applies)
  png, png32           PNG (also the default when no format is given)
  gif, tif, tiff, webp
  avif                 AVIF (quality applies)
  original             whatever format the source was loaded as
  auto                 pjpeg, or png when the image carries transparency

Configuration is read from ./rendition.toml when present, then from the
file passed with --config. Run 'rendition gen-config' for a documented
starting point.")]
#[command(version)]
struct Cli {
    /// Extra config file layered over ./rendition.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one image into another
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Exact output width
        #[arg(long)]
        width: Option<u32>,
        /// Exact output height
        #[arg(long)]
        height: Option<u32>,
        /// Bound the longer edge, keeping proportions
        #[arg(long)]
        max_edge: Option<u32>,
        /// Output format tag (defaults to the output file's extension)
        #[arg(long)]
        format: Option<String>,
        /// Encoder quality, 1-100
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Print dimensions and format details of an image
    Identify {
        path: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render every image below a directory into another directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        /// Bound the longer edge, keeping proportions
        #[arg(long)]
        max_edge: Option<u32>,
        /// Output format tag
        #[arg(long, default_value = "original")]
        format: String,
        /// Encoder quality, 1-100
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Print a stock rendition.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert {
            input,
            output: destination,
            width,
            height,
            max_edge,
            format,
            quality,
        } => {
            let spec = RenditionSpec {
                width,
                height,
                max_edge,
                format: format.or_else(|| extension_of(&destination)),
                quality: quality.map(Quality::new),
            };
            let config = load_config(cli.config.as_deref())?;
            let mut adapter = config.create_adapter();
            let report = create_rendition(&mut adapter, &input, &destination, &spec)?;
            output::print_rendition(&input, &destination, &report);
        }
        Command::Identify { path, json } => {
            let config = load_config(cli.config.as_deref())?;
            let mut adapter = config.create_adapter();
            let summary = describe(&mut adapter, &path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_identify(&path, &summary);
            }
        }
        Command::Batch {
            input_dir,
            output_dir,
            max_edge,
            format,
            quality,
        } => {
            let spec = RenditionSpec {
                max_edge,
                format: Some(format),
                quality: quality.map(Quality::new),
                ..RenditionSpec::default()
            };
            let config = load_config(cli.config.as_deref())?;
            let summary = batch::run_batch(&input_dir, &output_dir, &spec, &config)?;
            output::print_batch(&summary, &input_dir);
            if summary.failed() > 0 {
                return Err(format!("{} image(s) failed", summary.failed()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<config::AdapterConfig, Box<dyn std::error::Error>> {
    let config = config::load_config(&std::env::current_dir()?, explicit)?;
    tracing::debug!(backend = %config.backend.kind, "Configuration loaded");
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
