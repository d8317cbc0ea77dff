//! Command-line interface for the colorizer pipeline.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use burn::prelude::Backend;
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;

use colorizer_dataset::{
    DatasetIndex, DatasetManifest, PreprocessConfig, SplitRatio, load_inference_input,
    split_files,
};
use colorizer_models::{
    Colorizer, ColorizerModel, ColorizerModelConfig, ExtractorConfig, FeatureExtractor,
    load_checkpoint,
};
use colorizer_training::{OptimizerConfig, Trainer, TrainingConfig};

type CpuBackend = NdArray<f32>;
type TrainBackend = Autodiff<CpuBackend>;

#[derive(Parser)]
#[command(name = "colorizer", version, about = "Train and run an image colorization network")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the colorization network on a directory of images.
    Train(TrainArgs),

    /// Colorize an image with a trained checkpoint.
    Colorize(ColorizeArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Directory of training images.
    #[arg(long)]
    data: PathBuf,

    /// Output directory for checkpoints and the dataset manifest.
    #[arg(long, default_value = "runs")]
    out: PathBuf,

    /// Number of training epochs.
    #[arg(long, default_value_t = 20)]
    epochs: usize,

    /// Batch size.
    #[arg(long, default_value_t = 16)]
    batch_size: usize,

    /// Adam learning rate.
    #[arg(long, default_value_t = 1e-3)]
    learning_rate: f32,

    /// Square resolution images are trained at.
    #[arg(long, default_value_t = 128)]
    resolution: u32,

    /// Fraction of files used for training; the rest validate.
    #[arg(long, default_value_t = 0.9)]
    train_ratio: f32,

    /// Embedding dimension of the extractor.
    #[arg(long, default_value_t = 1000)]
    embed_dim: usize,

    /// Pretrained extractor checkpoint (random weights if omitted).
    #[arg(long)]
    extractor: Option<PathBuf>,

    /// Epochs between checkpoints.
    #[arg(long, default_value_t = 5)]
    checkpoint_every: usize,

    /// Random seed for reproducible shuffles and weights.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ColorizeArgs {
    /// Input image (any decodable format; color is discarded).
    input: PathBuf,

    /// Output image path.
    #[arg(short, long, default_value = "colorized.png")]
    output: PathBuf,

    /// Trained network checkpoint.
    #[arg(long)]
    model: PathBuf,

    /// Extractor checkpoint (random weights if omitted).
    #[arg(long)]
    extractor: Option<PathBuf>,

    /// Embedding dimension the checkpoints were built with.
    #[arg(long, default_value_t = 1000)]
    embed_dim: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Train(args) => run_train(&args),
        Command::Colorize(args) => run_colorize(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_train(args: &TrainArgs) -> Result<()> {
    let index = DatasetIndex::scan(&args.data)
        .with_context(|| format!("scanning {}", args.data.display()))?;
    tracing::info!(files = index.len(), "indexed dataset");

    let ratio = SplitRatio::try_new(args.train_ratio)
        .context("train ratio must be in (0, 1)")?;
    let files = index.into_files();
    let (train, val) = split_files(&files, ratio, args.seed);

    let preprocess = PreprocessConfig::new(args.resolution);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_manifest(&args.out, &args.data, &files, args.resolution)?;

    let device = Default::default();
    let extractor = build_extractor::<TrainBackend>(
        args.embed_dim,
        args.extractor.as_deref(),
        &device,
    )?;
    let model = ColorizerModel::<TrainBackend>::new(
        &ColorizerModelConfig::new(args.embed_dim),
        &device,
    );

    let mut config = TrainingConfig::new(args.epochs)
        .with_batch_size(args.batch_size)
        .with_optimizer(OptimizerConfig::adam(args.learning_rate))
        .with_checkpoint_frequency(args.checkpoint_every);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let trainer = Trainer::new(config);
    let (_, metrics) = trainer.train(
        model,
        &extractor,
        &train,
        &val,
        &preprocess,
        Some(args.out.as_path()),
        &device,
    )?;

    println!("{}", metrics.summary());
    Ok(())
}

fn run_colorize(args: &ColorizeArgs) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("colorizing {}", args.input.display()));

    let device = Default::default();
    let extractor = build_extractor::<CpuBackend>(
        args.embed_dim,
        args.extractor.as_deref(),
        &device,
    )?;

    let model = ColorizerModel::<CpuBackend>::new(
        &ColorizerModelConfig::new(args.embed_dim),
        &device,
    );
    let model_path = path_str(&args.model)?;
    let model = load_checkpoint::<CpuBackend, _>(model, model_path, &device)
        .with_context(|| format!("loading {}", args.model.display()))?;

    let preprocess = PreprocessConfig::default();
    let input = load_inference_input(&args.input, &preprocess)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let session = Colorizer::new(&extractor, &model, &device)?;
    let image = session.colorize(
        &input.lightness,
        &input.extractor_view,
        preprocess.extractor_resolution as usize,
    )?;

    let Some(buffer) = image::RgbImage::from_raw(image.width, image.height, image.data) else {
        bail!("colorized buffer does not match its dimensions");
    };
    buffer
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    spinner.finish_with_message(format!("wrote {}", args.output.display()));
    Ok(())
}

fn build_extractor<B: Backend>(
    embed_dim: usize,
    checkpoint: Option<&std::path::Path>,
    device: &B::Device,
) -> Result<FeatureExtractor<B>> {
    let extractor = FeatureExtractor::new(ExtractorConfig::new(embed_dim), device);
    match checkpoint {
        Some(path) => {
            let path_str = path_str(path)?;
            load_checkpoint::<B, _>(extractor, path_str, device)
                .with_context(|| format!("loading {}", path.display()))
        }
        None => {
            tracing::warn!("no extractor checkpoint given; using random weights");
            Ok(extractor)
        }
    }
}

fn write_manifest(
    out: &std::path::Path,
    data: &std::path::Path,
    files: &[PathBuf],
    resolution: u32,
) -> Result<()> {
    let name = data
        .file_name()
        .map_or_else(|| "dataset".to_string(), |n| n.to_string_lossy().into_owned());
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    let manifest = DatasetManifest::new(name, resolution)
        .with_files(names)
        .with_created_at(format!("unix:{created}"));
    manifest.save(out.join("manifest.json"))?;
    Ok(())
}

fn path_str(path: &std::path::Path) -> Result<&str> {
    path.to_str().context("path is not valid UTF-8")
}
