//! Sprite preparation CLI tool
//!
//! Command-line interface that runs a single image through the processing pipeline.

use super::config::CliConfigBuilder;
use crate::{
    config::DEFAULT_THRESHOLD, processor::ImageProcessor, tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const EXAMPLES: &str = "\
Examples:
  sprite-prep bird.png                      remove background, write bird_processed.png
  sprite-prep bird.png --simple -s 64       white-background removal, resize to 64x64
  sprite-prep pipe.jpg -s 52x320 -o out.png explicit output path and size
  sprite-prep tree.png --max-size 128       fit the longer side into 128 pixels
  sprite-prep ui.png --no-remove-bg -s 32   resize only";

/// Prepare game sprites: remove the background, resize, and write RGBA PNG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "sprite-prep", after_help = EXAMPLES)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output PNG path [default: <INPUT stem>_processed.png next to the input]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Target size: N for NxN, or WxH
    #[arg(short, long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Scale so the longer side is N pixels, keeping the aspect ratio
    #[arg(long, value_name = "N", conflicts_with = "size")]
    pub max_size: Option<u32>,

    /// Skip background removal
    #[arg(long)]
    pub no_remove_bg: bool,

    /// Use color-threshold removal instead of the segmentation model
    #[arg(long)]
    pub simple: bool,

    /// Channel value above which a pixel counts as background (with --simple)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// U2-Net ONNX model file [default: ~/.u2net/u2net.onnx]
    #[arg(short, long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Print a JSON processing report on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    run(&cli).await
}

/// Process the image described by already-parsed arguments
pub async fn run(cli: &Cli) -> Result<()> {
    if cli.simple && cli.no_remove_bg {
        debug!("--no-remove-bg given, --simple has no effect");
    } else if !cli.simple && cli.threshold != DEFAULT_THRESHOLD {
        warn!(
            threshold = cli.threshold,
            "--threshold only applies with --simple; ignoring"
        );
    }

    let config = CliConfigBuilder::from_cli(cli).context("Invalid arguments")?;
    let mut processor = ImageProcessor::new(config).context("Invalid arguments")?;

    let report = processor
        .process_file(&cli.input, cli.output.as_deref())
        .await
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    info!(
        path = %report.output_path.display(),
        "Processed image saved"
    );

    if cli.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    }

    Ok(())
}
